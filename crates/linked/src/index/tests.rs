use std::sync::Arc;

use contactsx_source::{ContactId, ContactRecord};
use pretty_assertions::assert_eq;

use super::*;

fn ids(v: &[ContactId]) -> Vec<&str> {
	v.iter().map(ContactId::as_str).collect()
}

/// U1 <- [R1, R2], U2 <- [R3].
fn example() -> LinkedIndex {
	let mut b = IndexBuilder::new();
	b.add_unified(ContactRecord::new("U1").named("Ann", "Lee"));
	b.add_unified(ContactRecord::new("U2").named("Bo", "Kim"));
	assert!(b.link(&"U1".into(), ContactRecord::new("R1")));
	assert!(b.link(&"U1".into(), ContactRecord::new("R2")));
	assert!(b.link(&"U2".into(), ContactRecord::new("R3")));
	b.finish()
}

#[test]
fn example_lookups() {
	let index = example();
	assert_eq!(ids(index.members_of("U1")), vec!["R1", "R2"]);
	assert_eq!(index.unified_of("R3"), Some(&ContactId::new("U2")));
	assert_eq!(index.unified_of("unknown"), None);
	assert!(index.members_of("unknown").is_empty());
	assert_eq!(index.len(), 2);
	assert_eq!(index.raw_len(), 3);
}

#[test]
fn record_accessors_follow_links() {
	let index = example();
	let u = index.unified_record_of("R2").expect("R2 is linked");
	assert_eq!(u.payload.given_name, "Ann");
	let members: Vec<&str> = index.member_records("U1").map(|r| r.id.as_str()).collect();
	assert_eq!(members, vec!["R1", "R2"]);
	assert!(index.raw_record("R3").is_some());
	assert!(index.unified_record("U9").is_none());
}

#[test]
fn builder_output_is_consistent() {
	assert_eq!(example().check_consistency(), Ok(()));
	assert_eq!(LinkedIndex::default().check_consistency(), Ok(()));
}

#[test]
fn second_link_for_raw_is_rejected() {
	let mut b = IndexBuilder::new();
	b.add_unified(ContactRecord::new("U1"));
	b.add_unified(ContactRecord::new("U2"));
	assert!(b.link(&"U1".into(), ContactRecord::new("R1")));
	assert!(!b.link(&"U2".into(), ContactRecord::new("R1")));
	assert_eq!(b.rejected(), 1);

	let index = b.finish();
	assert_eq!(index.unified_of("R1"), Some(&ContactId::new("U1")));
	assert!(index.members_of("U2").is_empty());
}

#[test]
fn unregistered_target_and_duplicate_unified_are_refused() {
	let mut b = IndexBuilder::new();
	assert!(b.add_unified(ContactRecord::new("U1")));
	assert!(!b.add_unified(ContactRecord::new("U1")));
	assert!(!b.link(&"U7".into(), ContactRecord::new("R1")));
	assert_eq!(b.rejected(), 0);
	assert_eq!(ids(b.unified_ids()), vec!["U1"]);
}

#[test]
fn memberless_groups_are_dropped() {
	let mut b = IndexBuilder::new();
	b.add_unified(ContactRecord::new("U1"));
	b.add_unified(ContactRecord::new("U2"));
	b.add_unified(ContactRecord::new("U3"));
	b.link(&"U3".into(), ContactRecord::new("R1"));
	let index = b.finish();

	let groups: Vec<&str> = index.groups().map(|(u, _)| u.as_str()).collect();
	assert_eq!(groups, vec!["U3"]);
	assert!(index.unified_record("U1").is_none());
}

#[test]
fn equality_ignores_physical_identity() {
	let a = Arc::new(example());
	let b = Arc::new(example());
	assert!(!Arc::ptr_eq(&a, &b));
	assert_eq!(a, b);

	let mut other = IndexBuilder::new();
	other.add_unified(ContactRecord::new("U1"));
	other.link(&"U1".into(), ContactRecord::new("R2"));
	other.link(&"U1".into(), ContactRecord::new("R1"));
	assert_ne!(*a, other.finish());
}

#[test]
fn detects_member_without_back_link() {
	let mut index = example();
	index.unified_of.insert("R2".into(), "U2".into());
	assert_eq!(
		index.check_consistency(),
		Err(Inconsistency::MemberNotBackLinked {
			unified: "U1".into(),
			raw: "R2".into(),
			found: Some("U2".into()),
		})
	);
}

#[test]
fn detects_back_link_without_member() {
	let mut index = example();
	index.unified_of.insert("R9".into(), "U1".into());
	assert_eq!(
		index.check_consistency(),
		Err(Inconsistency::BackLinkWithoutMember {
			raw: "R9".into(),
			unified: "U1".into(),
		})
	);
}

#[test]
fn detects_duplicate_member_within_group() {
	let mut index = example();
	index.members_of.insert("U2".into(), vec![ContactId::new("R3"), ContactId::new("R3")].into_boxed_slice());
	assert_eq!(
		index.check_consistency(),
		Err(Inconsistency::DuplicateMember { raw: "R3".into(), count: 2 })
	);
}

#[test]
fn debug_lists_groups_in_order() {
	assert_eq!(format!("{:?}", example()), r#"{"U1": ["R1", "R2"], "U2": ["R3"]}"#);
}
