//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::subtest::TestResult;

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum TestFailure {
    Diff { expected: String, got: String },
    Missing { check: String, full: String },
    Unwanted { check: String, full: String },
    CompileError(String),
    Panic(String, String),
    LackOfCompileError,
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Check<'data> {
    // expected
    MatchSection(String),
    // in-order checks, then lines that must not appear anywhere
    IndividualChecks {
        checks: Vec<&'data str>,
        absent: Vec<&'data str>,
    },
    // error message
    CompileError(String),
}

fn first_line(contents: &str) -> Option<(&str, &str)> {
    contents
        .find('\n')
        .map(|idx| (&contents[0..idx], &contents[idx + 1..]))
}

fn find_match_section<'data>(name: &str, rest: &str) -> Check<'data> {
    let mut lines = rest.lines();
    let mut section = String::default();

    assert_eq!(lines.next(), Some(";"), "test '{name}' has a malformed `; MATCH-SECTION`");

    for line in lines
        // an empty line `;` has to stay empty, but whitespace after `; ` is kept
        .map(|line| line.trim_start_matches("; ").trim_end())
        .take_while(|line| *line != ";;")
    {
        if line != ";" {
            section.push_str(line);
        }

        section.push('\n');
    }

    Check::MatchSection(section)
}

fn find_individual_checks(rest: &str) -> Check<'_> {
    let mut checks = Vec::default();
    let mut absent = Vec::default();

    for line in rest.lines().map(|line| line.trim_start()) {
        if let Some(check) = line.strip_prefix("; CHECK: ") {
            checks.push(check.trim_end());
        } else if let Some(check) = line.strip_prefix("; CHECK-NOT: ") {
            absent.push(check.trim_end());
        }
    }

    Check::IndividualChecks { checks, absent }
}

fn find_checks<'data>(name: &str, contents: &'data str) -> Check<'data> {
    let (first, rest) = match first_line(contents) {
        Some(data) => data,
        None => {
            return Check::IndividualChecks {
                checks: Vec::default(),
                absent: Vec::default(),
            }
        }
    };

    if first.starts_with("; MATCH-SECTION") {
        return find_match_section(name, rest);
    }

    if let Some(message) = first.strip_prefix("; COMPILE-ERROR: ") {
        return Check::CompileError(message.trim_end().to_string());
    }

    if first.starts_with("; STANDARD") {
        return find_individual_checks(rest);
    }

    panic!("test '{name}' did not provide `; <TYPE>` header for `filetest`. got: '{first}'")
}

fn match_compile_error(output: TestResult, err: &str) -> Result<(), TestFailure> {
    match output {
        TestResult::CompileError(got) if got.contains(err) => Ok(()),
        TestResult::CompileError(got) => Err(TestFailure::CompileError(got)),
        _ => Err(TestFailure::LackOfCompileError),
    }
}

fn match_section(output: TestResult, section: &str) -> Result<(), TestFailure> {
    match output {
        TestResult::Output(data) if data.contains(section) => Ok(()),
        TestResult::CompileError(err) => Err(TestFailure::CompileError(err)),
        TestResult::Output(data) => Err(TestFailure::Diff {
            expected: section.to_string(),
            got: data,
        }),
    }
}

fn match_checks(output: TestResult, checks: &[&str], absent: &[&str]) -> Result<(), TestFailure> {
    let data = match output {
        TestResult::Output(data) => data,
        TestResult::CompileError(err) => return Err(TestFailure::CompileError(err)),
    };

    if let Some(check) = absent.iter().find(|check| data.lines().any(|line| line == **check)) {
        return Err(TestFailure::Unwanted {
            check: check.to_string(),
            full: data,
        });
    }

    let mut checks = checks.iter().peekable();

    for line in data.lines() {
        let check = match checks.peek() {
            Some(check) => **check,
            None => break,
        };

        if line == check {
            let _ = checks.next();
        }
    }

    match checks.next() {
        None => Ok(()),
        Some(check) => Err(TestFailure::Missing {
            check: check.to_string(),
            full: data,
        }),
    }
}

/// The expectations that a single test file declares in its header.
#[derive(Debug, Hash, Eq, PartialEq)]
pub struct FileTestCase<'data> {
    check: Check<'data>,
}

impl<'data> FileTestCase<'data> {
    pub fn from_raw(name: &str, raw: &'data str) -> Self {
        Self {
            check: find_checks(name, raw),
        }
    }

    pub fn check(&self, output: TestResult) -> Result<(), TestFailure> {
        match &self.check {
            Check::MatchSection(section) => match_section(output, section),
            Check::CompileError(error) => match_compile_error(output, error),
            Check::IndividualChecks { checks, absent } => match_checks(output, checks, absent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_checks_are_ordered() {
        let case = FileTestCase::from_raw(
            "t.bif",
            "; STANDARD\n; CHECK: a\n; CHECK: c\n; CHECK-NOT: d\nFoo : int (int)\n",
        );

        assert_eq!(case.check(TestResult::Output("a\nb\nc\n".to_string())), Ok(()));
        assert!(matches!(
            case.check(TestResult::Output("c\na\n".to_string())),
            Err(TestFailure::Missing { .. })
        ));
        assert!(matches!(
            case.check(TestResult::Output("a\nc\nd\n".to_string())),
            Err(TestFailure::Unwanted { .. })
        ));
    }

    #[test]
    fn sections_and_errors() {
        let case = FileTestCase::from_raw("t.bif", "; MATCH-SECTION\n;\n; a\n;\n; b\n;;\nFoo : int (int)\n");

        assert_eq!(case.check(TestResult::Output("x\na\n\nb\ny\n".to_string())), Ok(()));

        let case = FileTestCase::from_raw("t.bif", "; COMPILE-ERROR: unknown type\nFoo : hlaf ()\n");

        assert_eq!(
            case.check(TestResult::CompileError("1:7: unknown type `hlaf`".to_string())),
            Ok(())
        );
        assert_eq!(
            case.check(TestResult::Output(String::default())),
            Err(TestFailure::LackOfCompileError)
        );
    }
}
