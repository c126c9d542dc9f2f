mod support;

use futures::future::join_all;
use support::{Engine, at, pharmacist, vaccination};
use vaxtrack_model::{FollowUpPolicy, VaccinationStatus};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_completions_have_exactly_one_winner() {
    let engine = Engine::in_memory(at(2025, 1, 1, 12));
    let ph = pharmacist("ph-1");
    let event = engine
        .records
        .record_vaccination(&ph, vaccination("P-1", at(2025, 1, 1, 10), FollowUpPolicy::Days14))
        .await
        .unwrap();

    let attempts = (0..2).map(|_| {
        let records = engine.records.clone();
        let ph = ph.clone();
        tokio::spawn(async move { records.mark_follow_up_completed(&ph, event.id).await })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| r.as_ref().is_err_and(|err| err.is_invalid_state()))
        .count();
    assert_eq!((successes, conflicts), (1, 1));
    assert_eq!(
        engine.records.get(event.id).await.unwrap().status,
        VaccinationStatus::FollowUpCompleted
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_recordings_do_not_conflict() {
    let engine = Engine::in_memory(at(2025, 1, 1, 12));

    let writes = (0..16).map(|n| {
        let records = engine.records.clone();
        tokio::spawn(async move {
            let ph = pharmacist("ph-1");
            let patient = format!("P-{n}");
            records
                .record_vaccination(
                    &ph,
                    vaccination(&patient, at(2025, 1, 1, 10), FollowUpPolicy::OneMonth),
                )
                .await
        })
    });
    for joined in join_all(writes).await {
        joined.expect("task panicked").unwrap();
    }

    let snapshot = engine
        .dashboard
        .snapshot(&pharmacist("ph-1"), at(2025, 1, 1, 12))
        .await
        .unwrap();
    assert_eq!(snapshot.counts.total_vaccinations, 16);
    assert_eq!(snapshot.counts.active_patients, 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sweep_racing_completion_leaves_a_consistent_state() {
    let engine = Engine::in_memory(at(2025, 1, 1, 12));
    let ph = pharmacist("ph-1");
    let event = engine
        .records
        .record_vaccination(&ph, vaccination("P-1", at(2025, 1, 1, 10), FollowUpPolicy::Days7))
        .await
        .unwrap();

    let records = engine.records.clone();
    let sweeper = tokio::spawn(async move { records.sweep_overdue(at(2026, 1, 1, 0)).await });
    let records = engine.records.clone();
    let completer =
        tokio::spawn(async move { records.mark_follow_up_completed(&ph, event.id).await });

    let swept = sweeper.await.expect("task panicked").unwrap();
    let completed = completer.await.expect("task panicked");

    let final_status = engine.records.get(event.id).await.unwrap().status;
    match completed {
        Ok(_) => {
            assert!(swept.missed.is_empty());
            assert_eq!(final_status, VaccinationStatus::FollowUpCompleted);
        }
        Err(err) => {
            assert!(err.is_invalid_state());
            assert_eq!(swept.missed, vec![event.id]);
            assert_eq!(final_status, VaccinationStatus::Missed);
        }
    }
}
