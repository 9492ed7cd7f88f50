//! Property tests for dentition isolation and finding de-duplication.

use proptest::prelude::*;

use odontogram_core::dentition::{DECIDUOUS_TEETH, PERMANENT_TEETH};
use odontogram_core::models::{ChartSite, Surface};
use odontogram_core::{ChartSnapshot, ClinicalWorkflow, DentitionKind};

fn site_strategy() -> impl Strategy<Value = ChartSite> {
    prop_oneof![
        Just(ChartSite::Whole),
        proptest::sample::select(Surface::ALL.to_vec()).prop_map(ChartSite::Surface),
    ]
}

fn condition_strategy() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(vec![
        "caries",
        "filling",
        "crown",
        "endodontics",
        "missing",
        "extraction",
        "not-in-catalog",
    ])
}

/// Run a full finding → session → completed cycle on one tooth.
fn chart_and_complete(
    workflow: &ClinicalWorkflow,
    snapshot: &ChartSnapshot,
    tooth_id: u8,
    site: ChartSite,
    condition: &str,
) -> ChartSnapshot {
    let snapshot = workflow.add_finding(snapshot, tooth_id, site, condition);
    let snapshot = workflow.create_session(&snapshot);
    let session_id = snapshot.plan().sessions().last().unwrap().id.clone();

    let Some(finding_id) = snapshot.pending_findings().first().map(|f| f.id.clone()) else {
        return snapshot;
    };
    let snapshot = workflow.assign_finding(&snapshot, &finding_id, &session_id);
    let Some(item_id) = snapshot
        .plan()
        .session(&session_id)
        .and_then(|s| s.items.last())
        .map(|i| i.id.clone())
    else {
        return snapshot;
    };
    workflow.toggle_treatment_status(&snapshot, &session_id, &item_id)
}

/// Plan a treatment on one tooth and return the session and item ids, if
/// the condition produced an item.
fn plan_item(
    workflow: &ClinicalWorkflow,
    snapshot: &ChartSnapshot,
    tooth_id: u8,
    site: ChartSite,
    condition: &str,
) -> (ChartSnapshot, Option<(String, String)>) {
    let snapshot = workflow.add_finding(snapshot, tooth_id, site, condition);
    let snapshot = workflow.create_session(&snapshot);
    let session_id = snapshot.plan().sessions().last().unwrap().id.clone();

    let Some(finding_id) = snapshot.pending_findings().first().map(|f| f.id.clone()) else {
        return (snapshot, None);
    };
    let snapshot = workflow.assign_finding(&snapshot, &finding_id, &session_id);
    let item_id = snapshot
        .plan()
        .session(&session_id)
        .and_then(|s| s.items.last())
        .map(|i| i.id.clone());
    (snapshot, item_id.map(|id| (session_id, id)))
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn permanent_edits_never_touch_deciduous(
        tooth_id in proptest::sample::select(PERMANENT_TEETH.to_vec()),
        site in site_strategy(),
        condition in condition_strategy(),
    ) {
        let workflow = ClinicalWorkflow::default();
        let before = ChartSnapshot::new();
        let after = chart_and_complete(&workflow, &before, tooth_id, site, condition);

        prop_assert_eq!(
            after.dentition(DentitionKind::Deciduous),
            before.dentition(DentitionKind::Deciduous)
        );
    }

    #[test]
    fn deciduous_edits_never_touch_permanent(
        tooth_id in proptest::sample::select(DECIDUOUS_TEETH.to_vec()),
        site in site_strategy(),
        condition in condition_strategy(),
    ) {
        let workflow = ClinicalWorkflow::default();
        let before = ChartSnapshot::new();
        let after = chart_and_complete(&workflow, &before, tooth_id, site, condition);

        prop_assert_eq!(
            after.dentition(DentitionKind::Permanent),
            before.dentition(DentitionKind::Permanent)
        );
    }

    #[test]
    fn identical_findings_collapse(
        tooth_id in proptest::sample::select(PERMANENT_TEETH.to_vec()),
        site in site_strategy(),
        condition in condition_strategy(),
        repeats in 1usize..5,
    ) {
        let workflow = ClinicalWorkflow::default();
        let mut snapshot = ChartSnapshot::new();
        for _ in 0..repeats {
            snapshot = workflow.add_finding(&snapshot, tooth_id, site, condition);
        }

        let expected = usize::from(workflow.catalog().lookup(condition).is_some());
        prop_assert_eq!(snapshot.pending_findings().len(), expected);
    }

    #[test]
    fn toggle_round_trips_leave_tooth_identical(
        tooth_id in proptest::sample::select(PERMANENT_TEETH.to_vec()),
        prior_site in site_strategy(),
        prior_condition in condition_strategy(),
        site in site_strategy(),
        condition in condition_strategy(),
    ) {
        let workflow = ClinicalWorkflow::default();
        // Chart something first so crown and whole-tooth writes have content to replace
        let charted = chart_and_complete(
            &workflow,
            &ChartSnapshot::new(),
            tooth_id,
            prior_site,
            prior_condition,
        );

        let (planned, ids) = plan_item(&workflow, &charted, tooth_id, site, condition);
        let Some((session_id, item_id)) = ids else {
            prop_assert!(workflow.catalog().lookup(condition).is_none());
            return Ok(());
        };

        let mut states = Vec::new();
        let mut snapshot = planned;
        for _ in 0..4 {
            snapshot = workflow.toggle_treatment_status(&snapshot, &session_id, &item_id);
            states.push(snapshot.tooth(tooth_id).cloned());
        }

        prop_assert_eq!(&states[0], &states[2]);
        prop_assert_eq!(&states[1], &states[3]);
    }
}
