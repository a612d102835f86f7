//! Batch moderation of pending community submissions, driven by an
//! external scheduler hitting `POST /api/moderation/sweep` every few
//! minutes. One invocation reviews a bounded batch of posts and comments;
//! a failing item costs one review attempt and never blocks its
//! neighbors, and since every status write is conditional on the item
//! still being pending, overlapping invocations cannot double-finalize.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use scamguard_ai::Classifier;
use scamguard_db::Database;
use scamguard_types::api::SweepReport;
use scamguard_types::models::{ModerationStatus, ModerationVerdict, ScamChannel};
use tracing::{error, info, warn};

use crate::state::{AppState, SweepSettings};

/// Minimum model quality score for a post to publish.
pub const POST_APPROVAL_SCORE: u8 = 60;
/// Comments clear a higher bar than posts.
pub const COMMENT_APPROVAL_SCORE: u8 = 70;

/// `POST /api/moderation/sweep`. Failures surface inside the report, not
/// as an HTTP error, so the scheduler always sees what happened.
pub async fn trigger_sweep(State(state): State<AppState>) -> Json<SweepReport> {
    let report = run_sweep(state.db.clone(), state.classifier.clone(), state.sweep).await;
    Json(report)
}

/// The decision the sweep writes for a classified item: the model must
/// both approve and score at or above the threshold.
fn decide(verdict: &ModerationVerdict, threshold: u8) -> ModerationStatus {
    if verdict.approved && verdict.score >= threshold {
        ModerationStatus::Approved
    } else {
        ModerationStatus::Rejected
    }
}

pub async fn run_sweep(
    db: Arc<Database>,
    classifier: Arc<dyn Classifier>,
    settings: SweepSettings,
) -> SweepReport {
    let mut report = SweepReport::default();

    sweep_posts(&db, classifier.as_ref(), settings, &mut report).await;
    sweep_comments(&db, classifier.as_ref(), settings, &mut report).await;

    report.ok = true;
    report.timestamp = Some(Utc::now());
    info!(
        "Moderation sweep done: {} posts ({} approved, {} rejected, {} flagged), \
         {} comments ({} approved, {} rejected, {} flagged), {} errors",
        report.posts_processed,
        report.posts_approved,
        report.posts_rejected,
        report.posts_flagged,
        report.comments_processed,
        report.comments_approved,
        report.comments_rejected,
        report.comments_flagged,
        report.errors.len()
    );
    report
}

async fn sweep_posts(
    db: &Arc<Database>,
    classifier: &dyn Classifier,
    settings: SweepSettings,
    report: &mut SweepReport,
) {
    let batch = {
        let db = db.clone();
        let limit = settings.post_batch;
        match run_db(move || db.pending_posts(limit)).await {
            Ok(batch) => batch,
            Err(e) => {
                error!("Pending post fetch failed: {:#}", e);
                report.errors.push(format!("Posts fetch error: {}", e));
                return;
            }
        }
    };

    for post in batch {
        let channel: ScamChannel = post.scam_type.parse().unwrap_or_else(|e| {
            warn!("Corrupt scam_type on post '{}': {}", post.id, e);
            ScamChannel::Online
        });

        match classifier.moderate_post(&post.content, channel).await {
            Ok(verdict) => {
                let status = decide(&verdict, POST_APPROVAL_SCORE);
                let write = {
                    let db = db.clone();
                    let id = post.id.clone();
                    let reason = verdict.reason.clone();
                    run_db(move || db.finalize_post(&id, status, verdict.score, &reason)).await
                };
                match write {
                    Ok(true) => {
                        report.posts_processed += 1;
                        match status {
                            ModerationStatus::Approved => report.posts_approved += 1,
                            _ => report.posts_rejected += 1,
                        }
                    }
                    // A concurrent sweep already finalized it; not ours to count.
                    Ok(false) => {}
                    Err(e) => {
                        error!("Post {} status write failed: {:#}", post.id, e);
                        report
                            .errors
                            .push(format!("Post {} update error: {}", post.id, e));
                    }
                }
            }
            Err(err) => {
                warn!("Post {} moderation failed: {}", post.id, err);
                report
                    .errors
                    .push(format!("Post {} moderation error: {}", post.id, err));

                let write = {
                    let db = db.clone();
                    let id = post.id.clone();
                    let max = settings.max_attempts;
                    let reason = err.to_string();
                    run_db(move || db.record_post_failure(&id, max, &reason)).await
                };
                match write {
                    Ok(true) => {
                        report.posts_flagged += 1;
                        warn!(
                            "Post {} flagged for manual review after {} failed attempts",
                            post.id, settings.max_attempts
                        );
                    }
                    Ok(false) => {}
                    Err(e) => {
                        error!("Post {} failure record failed: {:#}", post.id, e);
                        report
                            .errors
                            .push(format!("Post {} update error: {}", post.id, e));
                    }
                }
            }
        }
    }
}

async fn sweep_comments(
    db: &Arc<Database>,
    classifier: &dyn Classifier,
    settings: SweepSettings,
    report: &mut SweepReport,
) {
    let batch = {
        let db = db.clone();
        let limit = settings.comment_batch;
        match run_db(move || db.pending_comments(limit)).await {
            Ok(batch) => batch,
            Err(e) => {
                error!("Pending comment fetch failed: {:#}", e);
                report.errors.push(format!("Comments fetch error: {}", e));
                return;
            }
        }
    };

    for comment in batch {
        match classifier.moderate_comment(&comment.content).await {
            Ok(verdict) => {
                let status = decide(&verdict, COMMENT_APPROVAL_SCORE);
                let write = {
                    let db = db.clone();
                    let id = comment.id.clone();
                    let reason = verdict.reason.clone();
                    run_db(move || db.finalize_comment(&id, status, verdict.score, &reason)).await
                };
                match write {
                    Ok(true) => {
                        report.comments_processed += 1;
                        match status {
                            ModerationStatus::Approved => report.comments_approved += 1,
                            _ => report.comments_rejected += 1,
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        error!("Comment {} status write failed: {:#}", comment.id, e);
                        report
                            .errors
                            .push(format!("Comment {} update error: {}", comment.id, e));
                    }
                }
            }
            Err(err) => {
                warn!("Comment {} moderation failed: {}", comment.id, err);
                report
                    .errors
                    .push(format!("Comment {} moderation error: {}", comment.id, err));

                let write = {
                    let db = db.clone();
                    let id = comment.id.clone();
                    let max = settings.max_attempts;
                    let reason = err.to_string();
                    run_db(move || db.record_comment_failure(&id, max, &reason)).await
                };
                match write {
                    Ok(true) => {
                        report.comments_flagged += 1;
                        warn!(
                            "Comment {} flagged for manual review after {} failed attempts",
                            comment.id, settings.max_attempts
                        );
                    }
                    Ok(false) => {}
                    Err(e) => {
                        error!("Comment {} failure record failed: {:#}", comment.id, e);
                        report
                            .errors
                            .push(format!("Comment {} update error: {}", comment.id, e));
                    }
                }
            }
        }
    }
}

async fn run_db<T, F>(f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) => Err(anyhow::anyhow!("spawn_blocking join error: {}", e)),
    }
}
