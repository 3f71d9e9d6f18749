use async_trait::async_trait;
use gh_client::{IssueRef, IssueRefError};
use thiserror::Error;

use crate::format::comment_body;
use crate::issue::TrackedIssue;
use crate::persist::Snapshot;

/// Everything known about an issue before any time has been tracked on it.
#[derive(Clone, Debug, PartialEq)]
pub struct NewIssue {
    pub id: i64,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum CommentError {
    #[error(transparent)]
    UnrecognizedUrl(#[from] IssueRefError),
    #[error("failed to post comment: {0}")]
    Gateway(String),
}

/// Seam between the store and the network. The real implementation posts
/// through the stint API; tests inject a recording mock.
#[async_trait]
pub trait CommentGateway: Send + Sync {
    /// Post `body` as a comment on the referenced issue, returning the
    /// created comment's URL.
    async fn post_comment(&self, issue: &IssueRef, body: &str) -> Result<String, CommentError>;
}

/// Client-side work-session state: the tracked set, which issue is active,
/// and the comment-modal bookkeeping that an issue switch goes through.
///
/// An explicit container rather than a process-wide singleton, so every
/// owner (and every test) holds an independent instance.
///
/// Invariants:
/// - at most one issue is active at a time, addressed by id;
/// - `is_running` is never true while the comment modal is open for the
///   active issue. It is normally true only for the active issue, with one
///   exception: the re-track branch of `start_tracking` re-activates an
///   already-tracked id without pausing the previous active issue, so that
///   one can keep ticking. Quirk kept on purpose, pinned by test below;
/// - at most one "next" issue is staged while a switch is resolving.
#[derive(Debug, Default)]
pub struct TrackerStore {
    issues: Vec<TrackedIssue>,
    active_id: Option<i64>,
    next_issue: Option<NewIssue>,
    modal_open: bool,
    switching: bool,
}

impl TrackerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted state. Modal and switching flags are
    /// deliberately not part of the snapshot and always start cleared.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            issues: snapshot.issues,
            active_id: snapshot.active_id,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            issues: self.issues.clone(),
            active_id: self.active_id,
        }
    }

    pub fn issues(&self) -> &[TrackedIssue] {
        &self.issues
    }

    pub fn active_issue(&self) -> Option<&TrackedIssue> {
        self.active_id
            .and_then(|id| self.issues.iter().find(|i| i.id == id))
    }

    pub fn active_id(&self) -> Option<i64> {
        self.active_id
    }

    pub fn staged_issue(&self) -> Option<&NewIssue> {
        self.next_issue.as_ref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn is_switching(&self) -> bool {
        self.switching
    }

    fn issue_mut(&mut self, id: i64) -> Option<&mut TrackedIssue> {
        self.issues.iter_mut().find(|i| i.id == id)
    }

    /// Begin tracking `issue`, or — when another issue is already active —
    /// stage it and open the comment modal for the active one.
    ///
    /// This is the modal-driven switch path, for issues not yet tracked.
    /// Switching among already-tracked issues is `switch_to_issue`.
    pub fn start_tracking(&mut self, issue: NewIssue) {
        if self.issues.iter().any(|i| i.id == issue.id) {
            // Re-tracking an existing id only re-activates it; the timer is
            // NOT resumed, even if it was running when last active. Quirk
            // kept on purpose, pinned by test below.
            self.active_id = Some(issue.id);
            return;
        }

        match self.active_id {
            None => {
                self.issues.push(TrackedIssue {
                    id: issue.id,
                    title: issue.title,
                    url: issue.url,
                    elapsed_seconds: 0,
                    is_running: true,
                });
                self.active_id = Some(issue.id);
            }
            Some(active) => {
                if let Some(current) = self.issue_mut(active) {
                    current.is_running = false;
                }
                self.next_issue = Some(issue);
                self.switching = true;
                self.modal_open = true;
            }
        }
    }

    /// Explicit "I'm done, let me write a summary": suspend the active timer
    /// and open the comment modal without staging a next issue.
    pub fn stop_tracking(&mut self) {
        let Some(active) = self.active_id else {
            return;
        };
        if let Some(issue) = self.issue_mut(active) {
            issue.is_running = false;
        }
        self.modal_open = true;
    }

    /// Pause/resume the active issue's timer. No-op without an active issue;
    /// never touches the modal.
    pub fn toggle_timer(&mut self) {
        let Some(active) = self.active_id else {
            return;
        };
        if let Some(issue) = self.issue_mut(active) {
            issue.is_running = !issue.is_running;
        }
    }

    /// Close the modal without persisting anything. A switch in progress is
    /// fully aborted: the staged issue is dropped and the original resumes.
    pub fn cancel_comment(&mut self) {
        self.modal_open = false;

        if self.switching {
            self.next_issue = None;
            self.switching = false;
        }
        // Resumes unconditionally — a timer the user paused before pressing
        // stop comes back running after cancel. Suspect behavior, kept
        // as-is; pinned by cancel_resumes_even_if_paused_before_stop.
        if let Some(active) = self.active_id {
            if let Some(issue) = self.issue_mut(active) {
                issue.is_running = true;
            }
        }
    }

    /// Close the modal and drop the summary. The issue that triggered the
    /// modal is removed; a staged next issue (if any) takes over.
    pub fn discard_tracking(&mut self) {
        self.modal_open = false;
        self.remove_active();
        if self.switching {
            self.promote_staged();
        }
        self.switching = false;
    }

    /// Post the time summary plus `note` onto the active issue, then resolve
    /// the modal the same way `discard_tracking` does.
    ///
    /// No-op (and no network call) without an active issue. On any failure —
    /// unparseable issue URL or gateway error — no state is mutated, so the
    /// modal stays open and the caller can retry with the note intact.
    pub async fn submit_comment(
        &mut self,
        note: &str,
        gateway: &dyn CommentGateway,
    ) -> Result<Option<String>, CommentError> {
        let Some(issue) = self.active_issue().cloned() else {
            return Ok(None);
        };

        let issue_ref = IssueRef::from_url(&issue.url)?;
        let body = comment_body(issue.elapsed_seconds, note);
        let comment_url = gateway.post_comment(&issue_ref, &body).await?;

        self.modal_open = false;
        self.remove_active();
        if self.switching {
            self.promote_staged();
        }
        self.switching = false;

        Ok(Some(comment_url))
    }

    /// Instant, modal-less switch among already-tracked issues: pause the
    /// current active issue and start the requested one running. No-op for
    /// ids not in the tracked set.
    pub fn switch_to_issue(&mut self, issue_id: i64) {
        if !self.issues.iter().any(|i| i.id == issue_id) {
            return;
        }

        if let Some(active) = self.active_id {
            if let Some(issue) = self.issue_mut(active) {
                issue.is_running = false;
            }
        }

        self.active_id = Some(issue_id);
        if let Some(issue) = self.issue_mut(issue_id) {
            issue.is_running = true;
        }
    }

    /// One second of wall-clock time. Driven by `Ticker`.
    pub fn tick(&mut self) {
        for issue in &mut self.issues {
            if issue.is_running {
                issue.elapsed_seconds += 1;
            }
        }
    }

    fn remove_active(&mut self) {
        if let Some(active) = self.active_id.take() {
            self.issues.retain(|i| i.id != active);
        }
    }

    fn promote_staged(&mut self) {
        if let Some(next) = self.next_issue.take() {
            self.issues.push(TrackedIssue {
                id: next.id,
                title: next.title,
                url: next.url,
                elapsed_seconds: 0,
                is_running: true,
            });
            self.active_id = Some(next.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn issue_a() -> NewIssue {
        NewIssue {
            id: 1,
            title: "Fix flaky test".to_string(),
            url: "https://github.com/acme/widgets/issues/101".to_string(),
        }
    }

    fn issue_b() -> NewIssue {
        NewIssue {
            id: 2,
            title: "Add dark mode".to_string(),
            url: "https://github.com/acme/widgets/issues/202".to_string(),
        }
    }

    struct MockGateway {
        calls: Mutex<Vec<(IssueRef, String)>>,
        fail: bool,
    }

    impl MockGateway {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn calls(&self) -> Vec<(IssueRef, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommentGateway for MockGateway {
        async fn post_comment(
            &self,
            issue: &IssueRef,
            body: &str,
        ) -> Result<String, CommentError> {
            if self.fail {
                return Err(CommentError::Gateway("boom".to_string()));
            }
            self.calls
                .lock()
                .unwrap()
                .push((issue.clone(), body.to_string()));
            Ok(format!(
                "https://github.com/{}/{}/issues/{}#issuecomment-1",
                issue.owner, issue.repo, issue.number
            ))
        }
    }

    fn tick_n(store: &mut TrackerStore, n: u64) {
        for _ in 0..n {
            store.tick();
        }
    }

    #[test]
    fn test_start_tracking_fresh_issue() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());

        assert_eq!(store.issues().len(), 1);
        let active = store.active_issue().unwrap();
        assert_eq!(active.id, 1);
        assert_eq!(active.elapsed_seconds, 0);
        assert!(active.is_running);
        assert!(!store.is_modal_open());
    }

    #[test]
    fn test_retrack_same_issue_is_idempotent() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        tick_n(&mut store, 5);
        store.start_tracking(issue_a());

        assert_eq!(store.issues().len(), 1);
        assert_eq!(store.active_id(), Some(1));
        assert_eq!(store.active_issue().unwrap().elapsed_seconds, 5);
    }

    // Pins the quirk: re-tracking a paused issue re-activates it but does
    // not flip is_running back on.
    #[test]
    fn test_retrack_does_not_resume_paused_timer() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        store.toggle_timer();
        assert!(!store.active_issue().unwrap().is_running);

        store.start_tracking(issue_a());
        assert_eq!(store.active_id(), Some(1));
        assert!(!store.active_issue().unwrap().is_running);
    }

    // Pins the quirk: re-tracking a non-active id moves active_id without
    // pausing the previous active issue, which keeps ticking.
    #[test]
    fn test_retrack_other_issue_leaves_previous_timer_running() {
        let mut store = TrackerStore::from_snapshot(Snapshot {
            issues: vec![
                TrackedIssue {
                    id: 1,
                    title: "A".to_string(),
                    url: "https://github.com/acme/widgets/issues/101".to_string(),
                    elapsed_seconds: 50,
                    is_running: true,
                },
                TrackedIssue {
                    id: 2,
                    title: "B".to_string(),
                    url: "https://github.com/acme/widgets/issues/202".to_string(),
                    elapsed_seconds: 20,
                    is_running: false,
                },
            ],
            active_id: Some(1),
        });

        store.start_tracking(issue_b());
        tick_n(&mut store, 5);

        assert_eq!(store.active_id(), Some(2));
        let a = store.issues().iter().find(|i| i.id == 1).unwrap();
        assert!(a.is_running);
        assert_eq!(a.elapsed_seconds, 55);
        assert!(!store.active_issue().unwrap().is_running);
    }

    #[test]
    fn test_start_tracking_second_issue_stages_switch() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        tick_n(&mut store, 3);
        store.start_tracking(issue_b());

        // A is suspended but still present; B is staged, not tracked yet.
        assert_eq!(store.issues().len(), 1);
        let a = store.active_issue().unwrap();
        assert_eq!(a.id, 1);
        assert!(!a.is_running);
        assert_eq!(a.elapsed_seconds, 3);
        assert_eq!(store.staged_issue().map(|i| i.id), Some(2));
        assert!(store.is_modal_open());
        assert!(store.is_switching());
    }

    #[test]
    fn test_cancel_aborts_switch_and_preserves_original() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        tick_n(&mut store, 7);
        store.start_tracking(issue_b());
        store.cancel_comment();

        assert_eq!(store.issues().len(), 1);
        let a = store.active_issue().unwrap();
        assert_eq!(a.id, 1);
        assert!(a.is_running);
        assert_eq!(a.elapsed_seconds, 7);
        assert!(store.staged_issue().is_none());
        assert!(!store.is_modal_open());
        assert!(!store.is_switching());
    }

    // Pins the quirk: cancel resumes the timer even when the user had
    // paused it before opening the modal.
    #[test]
    fn test_cancel_resumes_even_if_paused_before_stop() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        store.toggle_timer();
        store.stop_tracking();
        store.cancel_comment();

        assert!(store.active_issue().unwrap().is_running);
    }

    #[test]
    fn test_discard_removes_original_and_promotes_staged() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        tick_n(&mut store, 4);
        store.start_tracking(issue_b());
        store.discard_tracking();

        assert_eq!(store.issues().len(), 1);
        let b = store.active_issue().unwrap();
        assert_eq!(b.id, 2);
        assert_eq!(b.elapsed_seconds, 0);
        assert!(b.is_running);
        assert!(!store.is_modal_open());
        assert!(!store.is_switching());
        assert!(store.issues().iter().all(|i| i.id != 1));
    }

    #[test]
    fn test_discard_without_switch_clears_active() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        store.stop_tracking();
        store.discard_tracking();

        assert!(store.issues().is_empty());
        assert_eq!(store.active_id(), None);
        assert!(!store.is_modal_open());
    }

    #[tokio::test]
    async fn test_submit_posts_summary_and_promotes_staged() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        tick_n(&mut store, 3661);
        store.start_tracking(issue_b());

        let gateway = MockGateway::new();
        let url = store
            .submit_comment("closing out for today", &gateway)
            .await
            .unwrap();
        assert!(url.is_some());

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, IssueRef::new("acme", "widgets", 101));
        assert!(calls[0].1.contains("1h 01m 01s"));
        assert!(calls[0].1.contains("closing out for today"));

        assert!(store.issues().iter().all(|i| i.id != 1));
        let b = store.active_issue().unwrap();
        assert_eq!(b.id, 2);
        assert_eq!(b.elapsed_seconds, 0);
        assert!(b.is_running);
        assert!(!store.is_modal_open());
        assert!(!store.is_switching());
    }

    #[tokio::test]
    async fn test_submit_without_switch_removes_active() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        store.stop_tracking();

        let gateway = MockGateway::new();
        store.submit_comment("done", &gateway).await.unwrap();

        assert!(store.issues().is_empty());
        assert_eq!(store.active_id(), None);
        assert!(!store.is_modal_open());
    }

    #[tokio::test]
    async fn test_no_active_issue_is_a_safe_noop() {
        let mut store = TrackerStore::new();
        store.toggle_timer();
        store.stop_tracking();

        let gateway = MockGateway::new();
        let result = store.submit_comment("note", &gateway).await.unwrap();

        assert_eq!(result, None);
        assert!(gateway.calls().is_empty());
        assert!(store.issues().is_empty());
        assert_eq!(store.active_id(), None);
        assert!(!store.is_modal_open());
    }

    #[tokio::test]
    async fn test_failed_submit_preserves_modal_state() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        tick_n(&mut store, 10);
        store.stop_tracking();

        let gateway = MockGateway::failing();
        let result = store.submit_comment("will retry", &gateway).await;

        assert!(result.is_err());
        assert!(store.is_modal_open());
        assert_eq!(store.issues().len(), 1);
        assert_eq!(store.active_id(), Some(1));
        assert_eq!(store.active_issue().unwrap().elapsed_seconds, 10);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_staged_switch_for_retry() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        tick_n(&mut store, 3661);
        store.start_tracking(issue_b());

        let failing = MockGateway::failing();
        let result = store.submit_comment("handing over", &failing).await;

        assert!(result.is_err());
        assert!(store.is_modal_open());
        assert!(store.is_switching());
        assert_eq!(store.staged_issue().map(|i| i.id), Some(2));
        assert_eq!(store.active_id(), Some(1));
        assert_eq!(store.active_issue().unwrap().elapsed_seconds, 3661);

        // A retry against a working gateway still resolves the switch.
        let gateway = MockGateway::new();
        store.submit_comment("handing over", &gateway).await.unwrap();

        assert_eq!(gateway.calls().len(), 1);
        assert!(gateway.calls()[0].1.contains("1h 01m 01s"));
        let b = store.active_issue().unwrap();
        assert_eq!(b.id, 2);
        assert!(b.is_running);
        assert!(!store.is_modal_open());
        assert!(!store.is_switching());
    }

    #[tokio::test]
    async fn test_submit_rejects_unrecognized_issue_url() {
        let mut store = TrackerStore::new();
        store.start_tracking(NewIssue {
            id: 9,
            title: "weird".to_string(),
            url: "https://example.com/not/an/issue".to_string(),
        });
        store.stop_tracking();

        let gateway = MockGateway::new();
        let result = store.submit_comment("note", &gateway).await;

        assert!(matches!(result, Err(CommentError::UnrecognizedUrl(_))));
        assert!(gateway.calls().is_empty());
        assert!(store.is_modal_open());
        assert_eq!(store.issues().len(), 1);
    }

    #[test]
    fn test_switch_to_issue_is_instant_and_modal_less() {
        let mut store = TrackerStore::from_snapshot(Snapshot {
            issues: vec![
                TrackedIssue {
                    id: 1,
                    title: "A".to_string(),
                    url: "https://github.com/acme/widgets/issues/101".to_string(),
                    elapsed_seconds: 50,
                    is_running: true,
                },
                TrackedIssue {
                    id: 2,
                    title: "B".to_string(),
                    url: "https://github.com/acme/widgets/issues/202".to_string(),
                    elapsed_seconds: 20,
                    is_running: false,
                },
            ],
            active_id: Some(1),
        });

        store.switch_to_issue(2);

        assert!(!store.is_modal_open());
        assert_eq!(store.active_id(), Some(2));
        let a = store.issues().iter().find(|i| i.id == 1).unwrap();
        let b = store.issues().iter().find(|i| i.id == 2).unwrap();
        assert!(!a.is_running);
        assert_eq!(a.elapsed_seconds, 50);
        assert!(b.is_running);
        assert_eq!(b.elapsed_seconds, 20);
    }

    #[test]
    fn test_switch_to_unknown_issue_is_a_noop() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        store.switch_to_issue(999);

        assert_eq!(store.active_id(), Some(1));
        assert!(store.active_issue().unwrap().is_running);
    }

    #[test]
    fn test_tick_only_advances_running_issues() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        tick_n(&mut store, 2);
        store.toggle_timer();
        tick_n(&mut store, 5);

        assert_eq!(store.active_issue().unwrap().elapsed_seconds, 2);
    }

    #[test]
    fn test_snapshot_drops_modal_state() {
        let mut store = TrackerStore::new();
        store.start_tracking(issue_a());
        store.start_tracking(issue_b());
        assert!(store.is_modal_open());

        let restored = TrackerStore::from_snapshot(store.snapshot());

        assert_eq!(restored.issues(), store.issues());
        assert_eq!(restored.active_id(), store.active_id());
        assert!(!restored.is_modal_open());
        assert!(!restored.is_switching());
        assert!(restored.staged_issue().is_none());
    }
}
