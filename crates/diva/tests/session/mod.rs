use diva::{
  publication::Publication,
  session::Session,
  sink::{JsonLinesSink, MemorySink},
};

use super::*;

#[traced_test]
#[tokio::test]
async fn test_run_writes_every_publication_and_counts_institutions() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_listing(&server, 1, &["diva2:1", "diva2:2"]).await;
  mount_listing(&server, 3, &["diva2:3"]).await;
  mount_export(&server, "diva2:1", export_body("First", "Uppsala University")).await;
  mount_export(&server, "diva2:2", export_body("Second", "Karolinska Institutet")).await;
  mount_export(&server, "diva2:3", export_body("Third", "Uppsala University")).await;

  let dir = tempdir()?;
  let output = dir.path().join("publications.jsonl");
  let config = mock_config(&server, 5).with_output_path(&output);

  let mut session = Session::new(&config)?;
  let mut sink = JsonLinesSink::open(&config.output_path).await?;
  let stats = session.run(&mut sink).await?;

  assert_eq!(stats.publications, 3);
  assert_eq!(
    stats.institutions.iter().map(String::as_str).collect::<Vec<_>>(),
    ["Karolinska Institutet", "Uppsala University"]
  );
  assert_eq!(sink.written(), 3);

  let titles: Vec<String> = std::fs::read_to_string(&output)?
    .lines()
    .map(|line| serde_json::from_str::<Publication>(line).map(|p| p.title.unwrap_or_default()))
    .collect::<Result<_, _>>()?;
  assert_eq!(titles, ["First", "Second", "Third"]);
  Ok(())
}

#[tokio::test]
async fn test_failure_keeps_earlier_records() -> TestResult<()> {
  let server = MockServer::start().await;
  // page 3 is never requested once diva2:2 fails
  mount_listing(&server, 1, &["diva2:1", "diva2:2"]).await;
  mount_export(&server, "diva2:1", export_body("First", "Uppsala University")).await;
  mount_export(&server, "diva2:2", "[]".to_string()).await;

  let mut session = Session::new(&mock_config(&server, 5))?;
  let mut sink = MemorySink::default();
  let err = session.run(&mut sink).await.unwrap_err();

  assert!(matches!(err, DivaError::RecordNotFound(ref id) if id == "diva2:2"));
  assert_eq!(sink.publications.len(), 1);
  assert_eq!(sink.publications[0].diva_id, "diva2:1");
  assert_eq!(session.stats().publications, 1);
  Ok(())
}

#[tokio::test]
async fn test_fetch_one_leaves_totals_alone() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_export(&server, "diva2:1", export_body("Only", "Lund University")).await;

  let session = Session::new(&mock_config(&server, 2))?;
  let publication = session.fetch_one("diva2:1").await?;

  assert_eq!(publication.title.as_deref(), Some("Only"));
  assert_eq!(session.stats().publications, 0);
  Ok(())
}
