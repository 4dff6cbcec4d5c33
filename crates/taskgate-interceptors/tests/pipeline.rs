mod common;

use common::*;
use futures::FutureExt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use taskgate_auth::prelude::Role;
use taskgate_interceptors::prelude::*;

fn wired(tasks: &[(i64, i64)]) -> (GuardChain, Arc<MemoryTasks>) {
    let lookup = MemoryTasks::with(tasks);
    let table = route_table(BreakerConfig::default());
    (chain(table, lookup.clone()), lookup)
}

async fn run(chain: &GuardChain, mut req: MockReq) -> (Result<(), InterceptError>, MockRes) {
    let mut res = MockRes::new();
    let result = chain
        .run_with_handler(GuardContext::default(), &mut req, &mut res, |_, _| {
            async move { Ok(serde_json::json!({"ok": true})) }.boxed()
        })
        .await;
    (result, res)
}

fn status_of(result: &Result<(), InterceptError>) -> u16 {
    result.as_ref().unwrap_err().0.http_status
}

fn message_of(result: &Result<(), InterceptError>) -> String {
    result.as_ref().unwrap_err().0.message_user.clone()
}

#[tokio::test]
async fn missing_authorization_header_is_401() {
    let (chain, _) = wired(&[]);
    let (result, _) = run(&chain, MockReq::get("/users")).await;
    assert_eq!(status_of(&result), 401);
}

#[tokio::test]
async fn non_bearer_credential_is_401() {
    let (chain, _) = wired(&[]);
    let req = MockReq::get("/users").raw_header("Authorization", "Basic dXNlcjpwdw==");
    let (result, _) = run(&chain, req).await;
    assert_eq!(status_of(&result), 401);
    assert_eq!(message_of(&result), "Authentication token is missing");
}

#[tokio::test]
async fn tampered_token_is_401() {
    let (chain, _) = wired(&[]);
    let mut token = token_for(1, &[Role::User]);
    token.push('x');
    let (result, _) = run(&chain, MockReq::get("/users").bearer(&token)).await;
    assert_eq!(status_of(&result), 401);
    assert_eq!(message_of(&result), "Authentication token is invalid");
}

#[tokio::test]
async fn empty_requirement_allows_plain_user() {
    // /users declares no roles; a non-admin principal passes the role stage.
    let (chain, _) = wired(&[]);
    let token = token_for(1, &[Role::User]);
    let (result, res) = run(&chain, MockReq::get("/users").bearer(&token)).await;
    assert!(result.is_ok());
    assert_eq!(res.status, 200);
    assert!(res.headers.contains_key("X-Request-Id"));
}

#[tokio::test]
async fn disjoint_roles_are_denied() {
    // GET /tasks falls back to the /tasks scope default (admin only).
    let (chain, _) = wired(&[]);
    let token = token_for(1, &[Role::User]);
    let (result, _) = run(&chain, MockReq::get("/tasks").bearer(&token)).await;
    assert_eq!(status_of(&result), 403);
    // Role denials surface the registry's default message for the code.
    assert_eq!(
        message_of(&result),
        "You don't have permission to perform this action."
    );
}

#[tokio::test]
async fn empty_role_set_is_denied_on_restricted_route() {
    let (chain, _) = wired(&[]);
    let token = token_for(1, &[]);
    let (result, _) = run(&chain, MockReq::get("/tasks").bearer(&token)).await;
    assert_eq!(status_of(&result), 403);
}

#[tokio::test]
async fn admin_bypasses_ownership_entirely() {
    // Task 5 belongs to user 2; admin 9 is allowed without any lookup.
    let (chain, lookup) = wired(&[(5, 2)]);
    let token = token_for(9, &[Role::Admin]);
    let (result, res) = run(&chain, MockReq::get("/tasks/5").bearer(&token)).await;
    assert!(result.is_ok());
    assert_eq!(res.status, 200);
    assert_eq!(lookup.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unparsable_identifier_is_400_before_any_lookup() {
    let (chain, lookup) = wired(&[(5, 1)]);
    let token = token_for(1, &[Role::User]);
    let (result, _) = run(&chain, MockReq::get("/tasks/abc").bearer(&token)).await;
    assert_eq!(status_of(&result), 400);
    assert_eq!(message_of(&result), "Task ID or assigned user is missing");
    assert_eq!(lookup.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn owner_reads_own_task() {
    let (chain, _) = wired(&[(5, 1)]);
    let token = token_for(1, &[Role::User]);
    let (result, res) = run(&chain, MockReq::get("/tasks/5").bearer(&token)).await;
    assert!(result.is_ok());
    assert_eq!(res.status, 200);
    // Handler result is returned unmodified.
    assert_eq!(res.body.unwrap()["ok"], true);
}

#[tokio::test]
async fn foreign_task_is_403_with_ownership_message() {
    let (chain, _) = wired(&[(5, 2)]);
    let token = token_for(1, &[Role::User]);
    let (result, _) = run(&chain, MockReq::get("/tasks/5").bearer(&token)).await;
    assert_eq!(status_of(&result), 403);
    assert_eq!(message_of(&result), "You do not own this task");
}

#[tokio::test]
async fn missing_task_is_404() {
    let (chain, _) = wired(&[]);
    let token = token_for(1, &[Role::User]);
    let (result, _) = run(&chain, MockReq::get("/tasks/5").bearer(&token)).await;
    assert_eq!(status_of(&result), 404);
    assert_eq!(message_of(&result), "Task not found");
}

#[tokio::test]
async fn empty_ownership_precondition_wins_over_identity_mismatch() {
    // User 2 owns nothing: the zero-count rule fires even though the
    // identity mismatch would also deny.
    let (chain, _) = wired(&[(5, 1)]);
    let token = token_for(1, &[Role::User]);
    let (result, _) = run(&chain, MockReq::get("/tasks/user/2").bearer(&token)).await;
    assert_eq!(status_of(&result), 403);
    assert_eq!(message_of(&result), "No tasks found for this user");
}

#[tokio::test]
async fn foreign_owner_listing_is_403() {
    let (chain, _) = wired(&[(5, 1), (6, 2)]);
    let token = token_for(1, &[Role::User]);
    let (result, _) = run(&chain, MockReq::get("/tasks/user/2").bearer(&token)).await;
    assert_eq!(status_of(&result), 403);
    assert_eq!(message_of(&result), "You do not own these tasks");
}

#[tokio::test]
async fn owner_lists_own_tasks() {
    let (chain, lookup) = wired(&[(5, 1), (6, 1), (7, 2)]);
    let token = token_for(1, &[Role::User]);
    let mut req = MockReq::get("/tasks/user/1").bearer(&token);
    let mut res = MockRes::new();
    let shared = lookup.clone();
    let result = chain
        .run_with_handler(GuardContext::default(), &mut req, &mut res, move |cx, _| {
            let lookup = shared;
            let owner = cx
                .route
                .as_ref()
                .and_then(|r| r.param_i64("owner_id"))
                .unwrap();
            async move {
                let page = lookup.list_by_owner(owner, Page::default()).await?;
                Ok(serde_json::json!({"total": page.total}))
            }
            .boxed()
        })
        .await;
    assert!(result.is_ok());
    assert_eq!(res.body.unwrap()["total"], 2);
}

#[tokio::test]
async fn undeclared_route_is_404() {
    let (chain, _) = wired(&[]);
    let token = token_for(1, &[Role::User]);
    let (result, _) = run(&chain, MockReq::get("/nope").bearer(&token)).await;
    assert_eq!(status_of(&result), 404);
}

#[tokio::test]
async fn inbound_request_id_is_echoed() {
    let (chain, _) = wired(&[]);
    let token = token_for(1, &[Role::User]);
    let req = MockReq::get("/users")
        .bearer(&token)
        .raw_header("X-Request-Id", "req-42");
    let (result, res) = run(&chain, req).await;
    assert!(result.is_ok());
    assert_eq!(res.headers.get("X-Request-Id").unwrap(), "req-42");
}
