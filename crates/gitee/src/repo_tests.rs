use pretty_assertions::assert_eq;

use super::*;

const REPOSITORY_JSON: &str = r#"{
    "id": 8803233,
    "full_name": "oars-sigs/drone",
    "name": "drone",
    "owner": {"login": "oars-sigs", "name": "oars"},
    "private": true,
    "fork": false,
    "html_url": "https://gitee.com/oars-sigs/drone.git",
    "ssh_url": "git@gitee.com:oars-sigs/drone.git",
    "default_branch": "master",
    "description": null,
    "permissions": {"admin": false, "push": true, "pull": true},
    "namespace": {"id": 1, "type": "group", "name": "oars", "path": "oars-sigs"}
}"#;

#[test]
fn test_convert_repository() {
    let dto: RepositoryDto = serde_json::from_str(REPOSITORY_JSON).unwrap();
    assert_eq!(
        convert_repository(dto),
        Repository {
            id: "8803233".into(),
            namespace: "oars-sigs".into(),
            name: "drone".into(),
            perm: Some(Perm {
                pull: true,
                push: true,
                admin: false,
            }),
            branch: "master".into(),
            private: true,
            clone: "https://gitee.com/oars-sigs/drone.git".into(),
            clone_ssh: "git@gitee.com:oars-sigs/drone.git".into(),
            link: "https://gitee.com/oars-sigs/drone".into(),
        }
    );
}

#[test]
fn test_convert_repository_tolerates_missing_and_null_fields() {
    let dto: RepositoryDto =
        serde_json::from_str(r#"{"id": 1, "default_branch": null, "permissions": null}"#).unwrap();
    let repo = convert_repository(dto);
    assert_eq!(repo.branch, "");
    assert_eq!(repo.perm, Some(Perm::default()));
    assert_eq!(repo.link, "");
}

#[test]
fn test_hook_events_are_derived_from_toggles() {
    let dto: HookDto = serde_json::from_str(
        r#"{
            "id": 7,
            "url": "https://ci.example.com/hook",
            "password": "s3cret",
            "push_events": true,
            "tag_push_events": true,
            "issues_events": true,
            "note_events": true,
            "merge_requests_events": true
        }"#,
    )
    .unwrap();
    assert_eq!(
        convert_hook(dto),
        Hook {
            id: "7".into(),
            target: "https://ci.example.com/hook".into(),
            events: vec![
                "pull_request".to_string(),
                "issues".to_string(),
                "issue_comment".to_string(),
                "push".to_string(),
            ],
            active: true,
            ..Hook::default()
        }
    );
}

#[test]
fn test_hook_without_toggles_has_no_events_but_is_active() {
    let dto: HookDto = serde_json::from_str(r#"{"id": 3, "url": "https://x"}"#).unwrap();
    let hook = convert_hook(dto);
    assert!(hook.events.is_empty());
    assert!(hook.active);
}

#[test]
fn test_hook_request_always_requests_fixed_events() {
    let input = HookInput {
        name: "ci".into(),
        target: "https://ci.example.com/hook".into(),
        secret: "s3cret".into(),
        events: vec!["issues".into()],
        skip_verify: true,
    };
    let body = serde_json::to_value(HookRequest::from_input(&input)).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "url": "https://ci.example.com/hook",
            "encryption_type": 0,
            "password": "s3cret",
            "push_events": true,
            "tag_push_events": true,
            "merge_requests_events": true,
        })
    );
}

#[tokio::test]
async fn test_status_operations_are_not_supported() {
    let service = GiteeRepositories::new(
        Transport::new(&crate::GiteeConfig::default()).unwrap(),
    );
    let ctx = CallContext::anonymous();
    let repo = RepoSlug::new("a/b").unwrap();

    let err = service
        .list_status(&ctx, &repo, "main", ListOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_not_supported());

    let err = service
        .create_status(&ctx, &repo, "main", &StatusInput::default())
        .await
        .unwrap_err();
    assert!(err.is_not_supported());
}
