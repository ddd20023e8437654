use crate::support::{self, MockHttpClient, SESSION_COOKIE};
use galaxy::{
    markdown::{self, error::Error as MarkdownError},
    Error, Runner, Variant,
};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

fn transcript_path(name: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("hello_galaxy_{}_{}.md", name, std::process::id()));
    let _ = fs::remove_file(&path);
    path
}

fn runner(variant: Variant, path: &Path, check: bool) -> Runner {
    let client = Arc::new(
        MockHttpClient::new().with_session_cookie(format!("{}; Path=/", SESSION_COOKIE)),
    );
    let mut configuration = support::configuration(variant, &client);
    configuration.set_transcript_path(path);
    configuration.set_check_transcript(check);

    Runner::new(configuration)
}

#[tokio::test]
async fn transcript_records_every_interaction_without_secrets() {
    let path = transcript_path("record");
    let runner = runner(Variant::Basic, &path, false);

    let log = runner.run(support::session()).await;
    runner.save_transcript(&log).unwrap();

    let recorded = markdown::load_markdown(&path).unwrap();
    assert_eq!(recorded.len(), 24);
    assert_eq!(recorded[0].method, "POST");
    assert_eq!(recorded[0].uri, "http://localhost:27018/galaxy");
    assert_eq!(recorded[0].request_body, r#"{"name":"mycollection"}"#);
    assert_eq!(recorded[0].response_body, r#"{"ok":1,"call":0}"#);

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("am9lOnB3"));
    assert!(!contents.contains(SESSION_COOKIE));

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn matching_runs_pass_the_structure_check() {
    let path = transcript_path("matching");

    for _ in 0..2 {
        let runner = runner(Variant::Full, &path, true);
        let log = runner.run(support::session()).await;
        runner.save_transcript(&log).unwrap();
    }

    assert_eq!(markdown::load_markdown(&path).unwrap().len(), 43);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn a_different_request_sequence_keeps_the_old_transcript() {
    let path = transcript_path("differing");

    let basic = runner(Variant::Basic, &path, true);
    let log = basic.run(support::session()).await;
    basic.save_transcript(&log).unwrap();

    let full = runner(Variant::Full, &path, true);
    let log = full.run(support::session()).await;

    match full.save_transcript(&log) {
        Err(Error::TranscriptError(MarkdownError::TranscriptsDiffer(difference))) => {
            assert_eq!(difference.interaction_number, 11);
            assert_eq!(
                difference.old_request.as_deref(),
                Some("GET http://localhost:27018/galaxy/mycollection?batchSize=2")
            );
            assert_eq!(
                difference.new_request.as_deref(),
                Some("POST http://localhost:27018/galaxy")
            );
        }
        other => panic!("expected differing transcripts, got {:?}", other),
    }

    assert_eq!(markdown::load_markdown(&path).unwrap().len(), 24);

    let _ = fs::remove_file(&path);
}
