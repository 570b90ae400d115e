use chrono::Duration;
use quiz_core::model::{PromptDraft, Resolution, RoundId, RoundSummary};
use quiz_core::scorer::score_answer;
use quiz_core::time::fixed_now;
use storage::repository::Storage;

fn answered(id: u64, answer: bool, ms: i64) -> Resolution {
    let prompt = PromptDraft::new(id, format!("Q{id}"), true)
        .validate()
        .unwrap();
    let presented = fixed_now();
    score_answer(&prompt, answer, presented, presented + Duration::milliseconds(ms))
}

#[tokio::test]
async fn storage_handles_share_one_backend() {
    let storage = Storage::in_memory();
    let round = RoundId::new(9);
    let resolutions = vec![answered(1, true, 900), answered(2, false, 1_400)];

    for resolution in &resolutions {
        storage
            .resolutions
            .append_resolution(round, resolution)
            .await
            .expect("append");
    }

    let logged = storage.resolutions.list_resolutions(round).await.unwrap();
    assert_eq!(logged.len(), 2);
    assert_eq!(logged[0].resolution, resolutions[0]);
    assert_eq!(logged[1].id, 2);

    let now = fixed_now();
    let summary = RoundSummary::from_resolutions(
        round,
        now,
        now + Duration::seconds(10),
        &resolutions,
    )
    .unwrap();
    let id = storage.summaries.append_summary(&summary).await.unwrap();
    let fetched = storage.summaries.get_summary(id).await.unwrap();
    assert_eq!(fetched.correct(), 1);
    assert_eq!(fetched.average_response_ms(), Some(1_150));
}

#[tokio::test]
async fn summaries_list_newest_first() {
    let storage = Storage::in_memory();
    let now = fixed_now();

    for (round, minutes) in [(1, 1), (2, 5), (3, 3)] {
        let summary = RoundSummary::from_resolutions(
            RoundId::new(round),
            now,
            now + Duration::minutes(minutes),
            &[],
        )
        .unwrap();
        storage.summaries.append_summary(&summary).await.unwrap();
    }

    let listed = storage.summaries.list_summaries(2).await.unwrap();
    let rounds: Vec<u64> = listed.iter().map(|(_, s)| s.round_id().value()).collect();
    assert_eq!(rounds, vec![2, 3]);
}
