// tests/series_property.rs

//! Property: for any sequence of succeeding/failing members, a series
//! executes exactly the prefix up to and including the first failure.

mod common;
use crate::common::builders::{test_context, Recorder};
use crate::common::init_tracing;

use proptest::prelude::*;

use taskpipe::task::{series, TaskRegistry};

proptest! {
    #[test]
    fn series_executes_exactly_the_prefix_through_first_failure(
        outcomes in proptest::collection::vec(any::<bool>(), 0..8),
    ) {
        init_tracing();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let checked: Result<(), TestCaseError> = rt.block_on(async {
            let recorder = Recorder::new();
            let mut registry = TaskRegistry::new();

            let mut members = Vec::with_capacity(outcomes.len());
            for (i, ok) in outcomes.iter().enumerate() {
                let name = format!("t{i}");
                let body = if *ok {
                    recorder.ok_task(&name)
                } else {
                    recorder.failing_task(&name, "boom")
                };
                members.push(registry.register_leaf(&name, body).unwrap());
            }
            let all = registry.register_series("all", members).unwrap();

            let result = series::run(&all, test_context()).await;

            let first_failure = outcomes.iter().position(|ok| !ok);
            let executed_upto = match first_failure {
                Some(i) => i + 1,
                None => outcomes.len(),
            };
            let expected: Vec<String> =
                (0..executed_upto).map(|j| format!("t{j}")).collect();
            prop_assert_eq!(recorder.executed(), expected);

            match first_failure {
                Some(i) => {
                    let err = result.unwrap_err();
                    let failed = format!("t{i}");
                    prop_assert_eq!(err.failed_task(), Some(failed.as_str()));
                }
                None => prop_assert!(result.is_ok()),
            }

            Ok(())
        });
        checked?;
    }
}
