use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use runner::exec::{ChildExit, LaunchSpec, ProcessLauncher};

/// A fake launcher that:
/// - records every `LaunchSpec` it was asked to run
/// - answers with pre-scripted results, in order.
///
/// When the script runs out, the last scripted result is repeated.
#[derive(Clone, Default)]
pub struct FakeLauncher {
    script: Arc<Mutex<VecDeque<io::Result<ChildExit>>>>,
    last: Arc<Mutex<Option<(String, i32)>>>,
    launched: Arc<Mutex<Vec<LaunchSpec>>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an attempt that runs and exits with `exit_code`.
    pub fn then_exit(self, output: &str, exit_code: i32) -> Self {
        self.script.lock().unwrap().push_back(Ok(ChildExit {
            output: output.to_string(),
            exit_code,
        }));
        self
    }

    /// Queue an attempt that cannot be started.
    pub fn then_fail_to_start(self, kind: io::ErrorKind) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(io::Error::new(kind, "scripted launch failure")));
        self
    }

    /// Specs seen so far; clones share the same record.
    pub fn launched(&self) -> Vec<LaunchSpec> {
        self.launched.lock().unwrap().clone()
    }

    pub fn launch_count(&self) -> usize {
        self.launched.lock().unwrap().len()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(
        &mut self,
        spec: LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = io::Result<ChildExit>> + Send + '_>> {
        self.launched.lock().unwrap().push(spec);

        let next = self.script.lock().unwrap().pop_front();
        let result = match next {
            Some(Ok(exit)) => {
                *self.last.lock().unwrap() = Some((exit.output.clone(), exit.exit_code));
                Ok(exit)
            }
            Some(Err(err)) => Err(err),
            None => match self.last.lock().unwrap().clone() {
                Some((output, exit_code)) => Ok(ChildExit { output, exit_code }),
                None => Err(io::Error::other("fake launcher has no scripted attempts")),
            },
        };

        Box::pin(async move { result })
    }
}
