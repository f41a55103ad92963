use tokio::task::JoinError;

/// Extracts the panic payload message from a failed join, if the task panicked.
///
/// Returns `None` for cancelled tasks.
pub fn join_error_panic_message(err: JoinError) -> Option<String> {
	if !err.is_panic() {
		return None;
	}
	let payload = err.into_panic();
	if let Some(s) = payload.downcast_ref::<&'static str>() {
		Some((*s).to_string())
	} else if let Some(s) = payload.downcast_ref::<String>() {
		Some(s.clone())
	} else {
		Some("non-string panic payload".to_string())
	}
}

/// Renders a join failure for error reporting.
pub fn describe_join_error(err: JoinError) -> String {
	if err.is_cancelled() {
		return "worker task cancelled".to_string();
	}
	match join_error_panic_message(err) {
		Some(msg) => format!("worker task panicked: {msg}"),
		None => "worker task failed".to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn extracts_static_str_payload() {
		let handle = tokio::spawn(async { panic!("boom-str") });
		let err = handle.await.unwrap_err();
		let msg = join_error_panic_message(err).expect("should be a panic");
		assert!(msg.contains("boom-str"), "expected 'boom-str', got: {msg}");
	}

	#[tokio::test]
	async fn extracts_string_payload() {
		let handle = tokio::spawn(async { panic!("{}", String::from("boom-string")) });
		let err = handle.await.unwrap_err();
		let msg = join_error_panic_message(err).expect("should be a panic");
		assert!(msg.contains("boom-string"), "expected 'boom-string', got: {msg}");
	}

	#[tokio::test]
	async fn cancellation_is_not_a_panic() {
		let handle = tokio::spawn(async {
			tokio::time::sleep(std::time::Duration::from_secs(60)).await;
		});
		handle.abort();
		let err = handle.await.unwrap_err();
		assert_eq!(describe_join_error(err), "worker task cancelled");
	}
}
