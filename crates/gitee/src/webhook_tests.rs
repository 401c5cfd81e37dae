use pretty_assertions::assert_eq;
use scm::{BoxError, StaticSecret};

use super::*;

const PUSH: &str = include_str!("../testdata/push.json");
const TAG_PUSH: &str = include_str!("../testdata/tag_push.json");
const PULL_REQUEST: &str = include_str!("../testdata/pull_request.json");

fn request(event: &str, body: &str) -> WebhookRequest {
    WebhookRequest::new(body).with_header(EVENT_HEADER, event)
}

fn no_secret() -> StaticSecret {
    StaticSecret::new("")
}

fn date(raw: &str) -> Option<DateTime<Utc>> {
    Some(DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc))
}

#[tokio::test]
async fn test_push_takes_first_commit_message_and_compare_link() {
    let hook = GiteeWebhooks
        .parse(&request("Push Hook", PUSH), &no_secret())
        .await
        .unwrap();
    let Webhook::Push(push) = hook else {
        panic!("expected a push event");
    };

    assert_eq!(push.reference, "refs/heads/master");
    assert_eq!(push.commit.sha, "4e6b4b5a3e0f3bbab3dbb3e3c6c4b6f6d4f2c9e1");
    assert_eq!(push.commit.message, "update .drone.yml.\n");
    assert_eq!(
        push.commit.link,
        "https://gitee.com/kit101/drone-yml-test/compare/0000000000000000000000000000000000000000...4e6b4b5a3e0f3bbab3dbb3e3c6c4b6f6d4f2c9e1"
    );
    assert_eq!(
        push.commit.author,
        Signature {
            login: "kit101".into(),
            name: "kit101".into(),
            email: "qinzhenguo@example.com".into(),
            avatar: None,
            date: date("2021-07-20T04:34:56Z"),
        }
    );
    assert_eq!(push.commit.committer.name, "Gitee");
    assert_eq!(push.commit.committer.login, "");

    assert_eq!(push.commits.len(), 2);
    assert_eq!(push.commits[1].message, "second commit\n");
    assert_eq!(
        push.commits[1].link,
        "https://gitee.com/kit101/drone-yml-test/commit/9a9b9c9d9e9f9a9b9c9d9e9f9a9b9c9d9e9f9a9b"
    );
    assert_eq!(
        push.commits[1].committer,
        Signature {
            date: date("2021-07-20T04:40:00Z"),
            ..Default::default()
        }
    );
    assert_eq!(push.sender.login, "kit101");
    assert_eq!(push.sender.email, "qinzhenguo@example.com");
}

#[tokio::test]
async fn test_push_repository_conversion() {
    let hook = GiteeWebhooks
        .parse(&request("Push Hook", PUSH), &no_secret())
        .await
        .unwrap();
    assert_eq!(
        hook.repository(),
        &Repository {
            id: "15868723".into(),
            namespace: "kit101".into(),
            name: "drone-yml-test".into(),
            perm: Some(Perm {
                pull: true,
                push: true,
                admin: false,
            }),
            branch: "master".into(),
            private: false,
            clone: "https://gitee.com/kit101/drone-yml-test.git".into(),
            clone_ssh: "git@gitee.com:kit101/drone-yml-test.git".into(),
            link: "https://gitee.com/kit101/drone-yml-test".into(),
        }
    );
}

#[tokio::test]
async fn test_tag_push_without_commits() {
    let hook = GiteeWebhooks
        .parse(&request("Tag Push Hook", TAG_PUSH), &no_secret())
        .await
        .unwrap();
    let Webhook::Push(push) = hook else {
        panic!("expected a push event");
    };
    assert_eq!(push.reference, "refs/tags/v1.0.0");
    assert!(push.commits.is_empty());
    assert_eq!(push.commit.sha, "4e6b4b5a3e0f3bbab3dbb3e3c6c4b6f6d4f2c9e1");
    assert_eq!(push.commit.message, "");
    assert_eq!(push.commit.author, Signature::default());
}

#[tokio::test]
async fn test_push_with_empty_object_yields_empty_event() {
    let hook = GiteeWebhooks
        .parse(&request("Push Hook", "{}"), &no_secret())
        .await
        .unwrap();
    let Webhook::Push(push) = hook else {
        panic!("expected a push event");
    };
    assert_eq!(push.reference, "");
    assert!(push.commits.is_empty());
    assert_eq!(push.repo.name, "");
}

#[tokio::test]
async fn test_unknown_event_is_rejected_before_parsing() {
    let err = GiteeWebhooks
        .parse(&request("Note Hook", "this is not json"), &no_secret())
        .await
        .unwrap_err();
    assert!(
        matches!(&err, ScmError::UnknownEvent { event } if event == "Note Hook"),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_missing_event_header_is_unknown() {
    let err = GiteeWebhooks
        .parse(&WebhookRequest::new(PUSH), &no_secret())
        .await
        .unwrap_err();
    assert!(matches!(&err, ScmError::UnknownEvent { event } if event.is_empty()));
}

#[tokio::test]
async fn test_event_header_is_case_insensitive() {
    let req = WebhookRequest::new(PUSH).with_header("x-gitee-event", "Push Hook");
    assert!(GiteeWebhooks.parse(&req, &no_secret()).await.is_ok());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let err = GiteeWebhooks
        .parse(&request("Push Hook", "{\"ref\": "), &no_secret())
        .await
        .unwrap_err();
    assert!(matches!(err, ScmError::Decode { .. }), "{err:?}");
}

#[tokio::test]
async fn test_matching_secret_is_accepted() {
    let req = request("Push Hook", PUSH).with_header(TOKEN_HEADER, "abc");
    let hook = GiteeWebhooks
        .parse(&req, &StaticSecret::new("abc"))
        .await
        .unwrap();
    assert_eq!(hook.sender().login, "kit101");
}

#[tokio::test]
async fn test_mismatched_secret_carries_the_event() {
    let req = request("Push Hook", PUSH).with_header(TOKEN_HEADER, "xyz");
    let err = GiteeWebhooks
        .parse(&req, &StaticSecret::new("abc"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScmError::SignatureInvalid { .. }), "{err:?}");
    assert_eq!(err.webhook().unwrap().repository().name, "drone-yml-test");
}

#[tokio::test]
async fn test_missing_token_header_fails_when_secret_configured() {
    let err = GiteeWebhooks
        .parse(&request("Push Hook", PUSH), &StaticSecret::new("abc"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScmError::SignatureInvalid { .. }));
}

#[tokio::test]
async fn test_empty_secret_skips_verification() {
    let req = request("Push Hook", PUSH).with_header(TOKEN_HEADER, "anything");
    assert!(GiteeWebhooks.parse(&req, &no_secret()).await.is_ok());
}

#[tokio::test]
async fn test_resolver_sees_parsed_repository() {
    let resolver = |hook: &Webhook| -> Result<String, BoxError> {
        match hook.repository().namespace.as_str() {
            "kit101" => Ok("per-repo".to_string()),
            other => Err(format!("unexpected namespace {other}").into()),
        }
    };
    let req = request("Push Hook", PUSH).with_header(TOKEN_HEADER, "per-repo");
    assert!(GiteeWebhooks.parse(&req, &resolver).await.is_ok());
}

#[tokio::test]
async fn test_resolver_failure_carries_the_event() {
    let resolver =
        |_: &Webhook| -> Result<String, BoxError> { Err("secret store offline".into()) };
    let err = GiteeWebhooks
        .parse(&request("Merge Request Hook", PULL_REQUEST), &resolver)
        .await
        .unwrap_err();
    assert!(matches!(err, ScmError::SecretResolution { .. }), "{err:?}");
    assert!(err.to_string().contains("secret store offline"));
    assert!(matches!(err.webhook(), Some(Webhook::PullRequest(_))));
}

#[tokio::test]
async fn test_pull_request_conversion() {
    let hook = GiteeWebhooks
        .parse(&request("Merge Request Hook", PULL_REQUEST), &no_secret())
        .await
        .unwrap();
    let Webhook::PullRequest(event) = hook else {
        panic!("expected a pull request event");
    };

    assert_eq!(event.action, Action::Open);
    assert_eq!(
        event.pull_request,
        PullRequest {
            number: 7,
            title: "Update .drone.yml".into(),
            body: "Runs the pipeline on tags as well.".into(),
            sha: "b9d3bcb7e2f1c2a1c1d0f6f3d8e0f8b2a3c4d5e6".into(),
            reference: "refs/pull/7/head".into(),
            source: "feature".into(),
            target: "master".into(),
            fork: "contributor/drone-yml-test".into(),
            link: "https://gitee.com/kit101/drone-yml-test/pulls/7".into(),
            closed: false,
            merged: false,
            author: User {
                login: "contributor".into(),
                name: "Contributor".into(),
                email: "contributor@example.com".into(),
                avatar: "https://gitee.com/assets/no_portrait.png".into(),
            },
            created: date("2021-07-21T01:00:00Z"),
            updated: date("2021-07-21T01:05:00Z"),
        }
    );
    assert!(event.repo.private);
    assert_eq!(event.sender.login, "contributor");
}

#[tokio::test]
async fn test_pull_request_actions() {
    let cases = [
        ("reopened", Action::Reopen),
        ("close", Action::Close),
        ("merge", Action::Merge),
        ("update", Action::Update),
        ("approved", Action::None),
    ];
    for (raw, expected) in cases {
        let action = format!("\"action\": \"{raw}\"");
        let body = PULL_REQUEST.replacen("\"action\": \"open\"", &action, 1);
        let hook = GiteeWebhooks
            .parse(&request("Merge Request Hook", &body), &no_secret())
            .await
            .unwrap();
        let Webhook::PullRequest(event) = hook else {
            panic!("expected pull request for {raw}");
        };
        assert_eq!(event.action, expected, "{raw}");
    }
}

#[tokio::test]
async fn test_closed_state_sets_closed_flag() {
    let body = PULL_REQUEST.replacen("\"state\": \"open\"", "\"state\": \"closed\"", 1);
    let hook = parse_pull_request_hook(body.as_bytes()).unwrap();
    let Webhook::PullRequest(event) = hook else {
        panic!("expected pull request");
    };
    assert!(event.pull_request.closed);
}

#[tokio::test]
async fn test_body_beyond_cap_is_discarded() {
    // A valid payload followed by padding past the cap parses only the prefix.
    let mut body = PUSH.as_bytes().to_vec();
    body.resize(MAX_BODY_BYTES + 16, b' ');
    body.extend_from_slice(b"garbage");
    let req = WebhookRequest::new(body).with_header(EVENT_HEADER, "Push Hook");
    let hook = GiteeWebhooks.parse(&req, &no_secret()).await.unwrap();
    assert_eq!(hook.repository().name, "drone-yml-test");
}

#[tokio::test]
async fn test_read_body_stops_at_cap() {
    let data = vec![b'x'; MAX_BODY_BYTES + 100];
    let read = read_body(data.as_slice()).await.unwrap();
    assert_eq!(read.len(), MAX_BODY_BYTES);
}

#[test]
fn test_constant_time_eq() {
    assert!(constant_time_eq(b"abc", b"abc"));
    assert!(!constant_time_eq(b"abc", b"abd"));
    assert!(!constant_time_eq(b"abc", b"abcd"));
    assert!(constant_time_eq(b"", b""));
}
