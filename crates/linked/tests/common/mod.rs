//! Shared fixtures for discovery integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use contactsx_source::{Authorization, ContactId, ContactRecord, ContactSource, FetchRequest, SourceError};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

/// Contact source whose answers, failures and timing are set by the test.
pub struct ScriptedSource {
	pub unified: Mutex<Vec<ContactRecord>>,
	pub raw: Mutex<Vec<ContactRecord>>,
	links: Mutex<HashMap<ContactId, ContactId>>,
	pub authorization: Mutex<Authorization>,
	pub fail_unified: Mutex<Option<SourceError>>,
	pub fail_raw: Mutex<Option<SourceError>>,
	gate: Mutex<Option<Arc<Semaphore>>>,
	started: Semaphore,
	direct: bool,
	pub fetches: AtomicUsize,
	pub subsumption_checks: AtomicUsize,
}

impl ScriptedSource {
	pub fn new(direct: bool) -> Self {
		Self {
			unified: Mutex::new(Vec::new()),
			raw: Mutex::new(Vec::new()),
			links: Mutex::new(HashMap::new()),
			authorization: Mutex::new(Authorization::Authorized),
			fail_unified: Mutex::new(None),
			fail_raw: Mutex::new(None),
			gate: Mutex::new(None),
			started: Semaphore::new(0),
			direct,
			fetches: AtomicUsize::new(0),
			subsumption_checks: AtomicUsize::new(0),
		}
	}

	/// Unified `[U1, U2]`, raw `[R1, R2, R3]`, with `R1, R2 ⊂ U1` and `R3 ⊂ U2`.
	pub fn example(direct: bool) -> Self {
		let source = Self::new(direct);
		*source.unified.lock() = vec![ContactRecord::new("U1").named("Ann", "Lee"), ContactRecord::new("U2").named("Bo", "Kim")];
		*source.raw.lock() = vec![
			ContactRecord::new("R1").named("Ann", "Lee"),
			ContactRecord::new("R2").named("Annie", "Lee"),
			ContactRecord::new("R3").named("Bo", "Kim"),
		];
		source.link("R1", "U1");
		source.link("R2", "U1");
		source.link("R3", "U2");
		source
	}

	pub fn link(&self, raw: &str, unified: &str) {
		self.links.lock().insert(raw.into(), unified.into());
	}

	/// Makes every subsequent fetch wait until [`ScriptedSource::release`].
	pub fn hold(&self) -> Arc<Semaphore> {
		let gate = Arc::new(Semaphore::new(0));
		*self.gate.lock() = Some(gate.clone());
		gate
	}

	/// Lets held fetches through and stops holding new ones.
	pub fn release(&self) {
		if let Some(gate) = self.gate.lock().take() {
			gate.add_permits(Semaphore::MAX_PERMITS / 2);
		}
	}

	/// Waits until `n` fetches have started.
	pub async fn wait_started(&self, n: u32) {
		tokio::time::timeout(Duration::from_secs(5), self.started.acquire_many(n))
			.await
			.expect("fetches did not start in time")
			.expect("started semaphore closed")
			.forget();
	}

	pub fn fetch_count(&self) -> usize {
		self.fetches.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl ContactSource for ScriptedSource {
	fn authorization(&self) -> Authorization {
		*self.authorization.lock()
	}

	async fn fetch_all(&self, request: FetchRequest) -> Result<Vec<ContactRecord>, SourceError> {
		self.fetches.fetch_add(1, Ordering::SeqCst);
		self.started.add_permits(1);

		let gate = self.gate.lock().clone();
		if let Some(gate) = gate {
			gate.acquire().await.expect("gate closed").forget();
		}

		let failure = if request.unify { self.fail_unified.lock().clone() } else { self.fail_raw.lock().clone() };
		if let Some(err) = failure {
			return Err(err);
		}

		let mut records = if request.unify { self.unified.lock().clone() } else { self.raw.lock().clone() };
		request.sort.sort(&mut records);
		Ok(records)
	}

	fn is_subsumed_by(&self, raw: &ContactId, unified: &ContactId) -> bool {
		self.subsumption_checks.fetch_add(1, Ordering::SeqCst);
		self.links.lock().get(raw) == Some(unified)
	}

	fn supports_direct_lookup(&self) -> bool {
		self.direct
	}

	fn unified_id_of(&self, raw: &ContactId) -> Option<ContactId> {
		self.links.lock().get(raw).cloned()
	}
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

pub fn ids(v: &[ContactId]) -> Vec<&str> {
	v.iter().map(ContactId::as_str).collect()
}
