//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::discovery;
use crate::testcase::TestFailure;
use backtrace::Backtrace;
use std::cell::RefCell;
use std::any::Any;
use std::panic::{self, Location};
use std::sync::mpsc::Receiver;
use std::sync::{mpsc, Once};
use std::time::{Duration, Instant};
use threadpool::ThreadPool;

thread_local! {
    static LAST_PANIC: RefCell<Option<(Backtrace, String)>> = RefCell::new(None);
}

static PANIC_HOOK: Once = Once::new();

// runner panics are reported as test failures, so the default hook's
// output would just be noise
fn record_panic(payload: &(dyn Any + Send), location: Option<&Location<'_>>) {
    let message = match payload.downcast_ref::<&str>() {
        Some(s) => s.to_string(),
        None => match payload.downcast_ref::<String>() {
            Some(s) => s.clone(),
            None => "<no message>".to_string(),
        },
    };

    let message = match location {
        Some(loc) => format!("{message} (at {}:{})", loc.file(), loc.line()),
        None => message,
    };

    LAST_PANIC.with(|p| *p.borrow_mut() = Some((Backtrace::new(), message)));
}

fn take_panic() -> (String, String) {
    match LAST_PANIC.with(|p| p.borrow_mut().take()) {
        Some((bt, message)) => (format!("{bt:?}"), message),
        None => (String::default(), "<unknown panic>".to_string()),
    }
}

/// What a runner produced for a single file.
pub enum TestResult {
    Output(String),
    CompileError(String),
}

pub struct TestDetails {
    pub elapsed: Duration,
    pub output: Result<(), TestFailure>,
}

/// A subdirectory of `tests/` and the runner that every file in it goes through.
pub struct Subtest {
    subdir: &'static str,
    runner: fn(&str, &str) -> TestResult,
}

impl Subtest {
    pub const fn new(subdir: &'static str, runner: fn(&str, &str) -> TestResult) -> Self {
        Self { subdir, runner }
    }

    pub fn subdir(&self) -> &'static str {
        self.subdir
    }

    pub fn run(&self, pool: &mut ThreadPool) -> Receiver<(&'static str, TestDetails)> {
        let (send, recv) = mpsc::channel();

        PANIC_HOOK.call_once(|| panic::set_hook(Box::new(|info| record_panic(info.payload(), info.location()))));

        for &(name, contents, ref case) in discovery::cases_in_subdir(self.subdir) {
            let send = send.clone();
            let runner = self.runner;

            pool.execute(move || {
                let start = Instant::now();
                let result = panic::catch_unwind(|| runner(name, contents));
                let elapsed = start.elapsed();
                let output = match result {
                    Ok(output) => case.check(output),
                    Err(_) => {
                        let (bt, message) = take_panic();

                        Err(TestFailure::Panic(bt, message))
                    }
                };

                let details = TestDetails { elapsed, output };

                send.send((name, details)).expect("unable to send")
            });
        }

        recv
    }
}
