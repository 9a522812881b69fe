// self
use crate::{auth::StrategyKind, obs::RequestOutcome};

/// Counter incremented once per attempt, success, and failure.
pub const REQUEST_COUNTER: &str = "mkm_sdk_request_total";

/// Records a request outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(strategy: StrategyKind, outcome: RequestOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			REQUEST_COUNTER,
			"strategy" => strategy.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (strategy, outcome);
	}
}

/// Recorder keeping `(strategy, outcome) -> count` for the request counter.
#[cfg(all(test, feature = "metrics"))]
#[derive(Clone, Default)]
pub(crate) struct CaptureRecorder {
	counts: std::sync::Arc<std::sync::Mutex<Vec<(String, String, u64)>>>,
}
#[cfg(all(test, feature = "metrics"))]
impl CaptureRecorder {
	/// Counts sorted by strategy, then outcome.
	pub(crate) fn counts(&self) -> Vec<(String, String, u64)> {
		let mut counts = self.counts.lock().expect("Capture lock should not be poisoned.").clone();

		counts.sort();

		counts
	}
}
#[cfg(all(test, feature = "metrics"))]
impl metrics::Recorder for CaptureRecorder {
	fn describe_counter(
		&self,
		_: metrics::KeyName,
		_: Option<metrics::Unit>,
		_: metrics::SharedString,
	) {
	}

	fn describe_gauge(
		&self,
		_: metrics::KeyName,
		_: Option<metrics::Unit>,
		_: metrics::SharedString,
	) {
	}

	fn describe_histogram(
		&self,
		_: metrics::KeyName,
		_: Option<metrics::Unit>,
		_: metrics::SharedString,
	) {
	}

	fn register_counter(&self, key: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Counter {
		if key.name() != REQUEST_COUNTER {
			return metrics::Counter::noop();
		}

		let label = |name: &str| {
			key.labels()
				.find(|label| label.key() == name)
				.map(|label| label.value().to_owned())
				.unwrap_or_default()
		};

		metrics::Counter::from_arc(std::sync::Arc::new(CaptureCounter {
			strategy: label("strategy"),
			outcome: label("outcome"),
			counts: self.counts.clone(),
		}))
	}

	fn register_gauge(&self, _: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Gauge {
		metrics::Gauge::noop()
	}

	fn register_histogram(
		&self,
		_: &metrics::Key,
		_: &metrics::Metadata<'_>,
	) -> metrics::Histogram {
		metrics::Histogram::noop()
	}
}

#[cfg(all(test, feature = "metrics"))]
struct CaptureCounter {
	strategy: String,
	outcome: String,
	counts: std::sync::Arc<std::sync::Mutex<Vec<(String, String, u64)>>>,
}
#[cfg(all(test, feature = "metrics"))]
impl metrics::CounterFn for CaptureCounter {
	fn increment(&self, value: u64) {
		let mut counts = self.counts.lock().expect("Capture lock should not be poisoned.");

		match counts.iter_mut().find(|(s, o, _)| *s == self.strategy && *o == self.outcome) {
			Some((_, _, count)) => *count += value,
			None => counts.push((self.strategy.clone(), self.outcome.clone(), value)),
		}
	}

	fn absolute(&self, _: u64) {}
}
