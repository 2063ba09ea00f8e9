use crate::unwind::PanicKind;
use faultcap::Fault;
use proptest::collection::vec;
use test_strategy::Arbitrary;

/// A unit of work for property tests: adds each step to a counter, then
/// optionally panics.
#[derive(Clone, Debug, Arbitrary)]
pub struct TestWork {
    #[strategy(vec(1_u64..100, 0..8))]
    pub steps: Vec<u64>,
    pub panic: Option<PanicKind>,
}

impl TestWork {
    pub fn completing(steps: Vec<u64>) -> Self {
        Self { steps, panic: None }
    }

    pub fn panicking(steps: Vec<u64>, kind: PanicKind) -> Self {
        Self { steps, panic: Some(kind) }
    }

    pub fn run(&self, counter: &mut u64) {
        for step in &self.steps {
            *counter += step;
        }
        if let Some(kind) = &self.panic {
            kind.trigger();
        }
    }

    /// The counter value after `run`, whether or not it panicked.
    pub fn expected_counter(&self) -> u64 {
        self.steps.iter().sum()
    }

    pub fn expected_fault(&self) -> Option<Fault> {
        self.panic.as_ref().map(PanicKind::expected_fault)
    }
}
