use pretty_assertions::assert_eq;

use super::*;

fn tags() -> Vec<TagDto> {
    serde_json::from_str(
        r#"[
            {"name": "v1.2.2", "message": "", "commit": {"sha": "1111", "date": "2021-01-01T00:00:00+08:00"}},
            {"name": "v1.2.3", "message": "release", "commit": {"sha": "2222"}},
            {"name": "v1.2.3", "message": "duplicate", "commit": {"sha": "3333"}}
        ]"#,
    )
    .unwrap()
}

#[test]
fn test_select_tag_returns_first_exact_match() {
    let found = select_tag(tags(), "v1.2.3").unwrap();
    assert_eq!(
        found,
        Reference {
            name: "v1.2.3".into(),
            path: "v1.2.3".into(),
            sha: "2222".into(),
        }
    );
}

#[test]
fn test_select_tag_strips_ref_prefix_from_query() {
    assert_eq!(select_tag(tags(), "refs/tags/v1.2.2").unwrap().sha, "1111");
}

#[test]
fn test_select_tag_missing_is_not_found() {
    let err = select_tag(tags(), "v9.9.9").unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert!(select_tag(Vec::new(), "v1.2.3").unwrap_err().is_not_found());
}

#[test]
fn test_select_tag_requires_exact_match() {
    assert!(select_tag(tags(), "v1.2").unwrap_err().is_not_found());
}

#[test]
fn test_convert_branch_restores_heads_prefix() {
    let dto: BranchDto = serde_json::from_str(
        r#"{"name": "master", "commit": {"sha": "abc123", "url": "https://gitee.com/api/v5/repos/a/b/commits/abc123"}, "protected": false}"#,
    )
    .unwrap();
    assert_eq!(
        convert_branch(dto),
        Reference {
            name: "master".into(),
            path: "refs/heads/master".into(),
            sha: "abc123".into(),
        }
    );
}

#[test]
fn test_convert_commit_uses_account_objects() {
    let dto: CommitDto = serde_json::from_str(
        r#"{
            "sha": "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d",
            "url": "https://gitee.com/api/v5/repos/a/b/commits/7fd1a60b",
            "html_url": "https://gitee.com/a/b/commit/7fd1a60b",
            "commit": {
                "message": "Merge pull request #6",
                "author": {"name": "Monalisa Octocat", "email": "mona@example.com", "date": "2021-03-04T10:11:12+08:00"},
                "committer": {"name": "Gitee", "email": "noreply@gitee.com", "date": "2021-03-04T10:11:12+08:00"}
            },
            "author": {"login": "octocat", "name": "The Octocat", "email": null, "avatar_url": "https://a/octocat.png"},
            "committer": null
        }"#,
    )
    .unwrap();
    let commit = convert_commit(dto);
    let date = DateTime::parse_from_rfc3339("2021-03-04T02:11:12Z")
        .unwrap()
        .with_timezone(&Utc);

    assert_eq!(commit.sha, "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d");
    assert_eq!(commit.link, "https://gitee.com/a/b/commit/7fd1a60b");
    assert_eq!(commit.message, "Merge pull request #6");
    assert_eq!(
        commit.author,
        Signature {
            login: "octocat".into(),
            name: "The Octocat".into(),
            email: "mona@example.com".into(),
            avatar: Some("https://a/octocat.png".into()),
            date: Some(date),
        }
    );
    assert_eq!(
        commit.committer,
        Signature {
            login: "Gitee".into(),
            name: "Gitee".into(),
            email: "noreply@gitee.com".into(),
            avatar: None,
            date: Some(date),
        }
    );
}

#[test]
fn test_convert_commit_falls_back_to_api_url() {
    let dto: CommitDto =
        serde_json::from_str(r#"{"sha": "abc", "url": "https://api/commit/abc"}"#).unwrap();
    assert_eq!(convert_commit(dto).link, "https://api/commit/abc");
}

#[tokio::test]
async fn test_history_operations_are_not_supported() {
    let service = GiteeGit::new(Transport::new(&crate::GiteeConfig::default()).unwrap());
    let ctx = CallContext::anonymous();
    let repo = RepoSlug::new("a/b").unwrap();

    assert!(service
        .list_commits(&ctx, &repo, &CommitListOptions::default())
        .await
        .unwrap_err()
        .is_not_supported());
    assert!(service
        .list_changes(&ctx, &repo, "abc", ListOptions::default())
        .await
        .unwrap_err()
        .is_not_supported());
    assert!(service
        .compare_changes(&ctx, &repo, "a", "b", ListOptions::default())
        .await
        .unwrap_err()
        .is_not_supported());
}
