//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::testcase::FileTestCase;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use spirv_bif::utility::SaHashMap;

type DirectoryContents = SaHashMap<String, Vec<(&'static str, &'static str, FileTestCase<'static>)>>;

static ALL_TEST_CASES: OnceLock<DirectoryContents> = OnceLock::new();

// test files live for the whole run, so leaking them is fine
fn leak(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

fn recursive_build(out: &mut DirectoryContents, curr_key: String, current_dir: PathBuf) {
    let mut subdirs = Vec::default();

    {
        let files = match out.entry(curr_key.clone()) {
            Entry::Vacant(vac) => vac.insert(Vec::default()),
            Entry::Occupied(_) => unreachable!(),
        };

        for entry in fs::read_dir(current_dir).expect("invalid directory") {
            let entry = entry.expect("i/o error");
            let metadata = entry.metadata().expect("unable to stat file");
            let name = entry.file_name().into_string().expect("invalid UTF-8 path");
            let path = entry.path();

            if metadata.is_dir() {
                let inner = if curr_key.is_empty() {
                    name
                } else {
                    format!("{curr_key}/{name}")
                };

                subdirs.push((inner, path));
            } else {
                let name = leak(name);
                let content = leak(fs::read_to_string(&path).expect("unable to read file"));

                files.push((name, content, FileTestCase::from_raw(name, content)))
            }
        }

        files.sort_by(|(n1, _, _), (n2, _, _)| n1.cmp(n2));
    }

    for (inner, path) in subdirs {
        recursive_build(out, inner, path);
    }
}

fn init_directory() -> DirectoryContents {
    let mut map = DirectoryContents::default();
    let mut root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    root.push("tests/");

    recursive_build(&mut map, String::default(), root);

    map
}

pub fn cases_in_subdir(
    path: &'static str,
) -> &'static [(&'static str, &'static str, FileTestCase<'static>)] {
    let all = ALL_TEST_CASES.get_or_init(init_directory);

    match all.get(path) {
        Some(cases) => cases,
        None => panic!("no files found for path `{path}`"),
    }
}
