use diva::export::RecordFetcher;

use super::*;

#[traced_test]
#[tokio::test]
async fn test_fetch_normalizes_export() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_export(&server, "diva2:1600051", export_body("Tumour segmentation", "Uppsala University"))
    .await;

  let fetcher = RecordFetcher::new(&mock_config(&server, 2))?;
  let publication = fetcher.fetch("diva2:1600051").await?;

  assert_eq!(publication.diva_id, "diva2:1600051");
  assert_eq!(publication.title.as_deref(), Some("Tumour segmentation"));
  assert_eq!(publication.kind, Some(PublicationType::ArticleJournal));
  assert_eq!(publication.language, Some(Language::English));
  assert_eq!(publication.affiliation_names().collect::<Vec<_>>(), ["Uppsala University"]);
  assert_eq!(publication.publication_date.map(|date| date.to_string()).as_deref(), Some("2021-09-27"));
  Ok(())
}

#[tokio::test]
async fn test_export_with_defects_is_repaired() -> TestResult<()> {
  let server = MockServer::start().await;
  let body = "[{\"title\": \"The \\p-value\tdebate\",\n \"note\": \"95\\% CI\"}]".to_string();
  mount_export(&server, "diva2:1", body).await;

  let publication = RecordFetcher::new(&mock_config(&server, 2))?.fetch("diva2:1").await?;

  assert_eq!(publication.title.as_deref(), Some("The p-value debate"));
  assert_eq!(publication.note.as_deref(), Some("95% CI"));
  Ok(())
}

#[tokio::test]
async fn test_empty_export_is_not_found() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_export(&server, "diva2:404", "[]".to_string()).await;

  let err = RecordFetcher::new(&mock_config(&server, 2))?.fetch("diva2:404").await.unwrap_err();
  assert!(matches!(err, DivaError::RecordNotFound(ref id) if id == "diva2:404"));
  Ok(())
}

#[tokio::test]
async fn test_unknown_type_depends_on_policy() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_export(&server, "diva2:5", json!([{ "type": "hologram" }]).to_string()).await;

  let strict = RecordFetcher::new(&mock_config(&server, 2))?.fetch("diva2:5").await;
  assert!(matches!(
    strict,
    Err(DivaError::UnrecognizedValue { field: "type", ref value }) if value == "hologram"
  ));

  let lenient_config = mock_config(&server, 2).with_enum_policy(EnumPolicy::Lenient);
  let lenient = RecordFetcher::new(&lenient_config)?.fetch("diva2:5").await?;
  assert_eq!(lenient.kind, Some(PublicationType::Unrecognized("hologram".into())));
  Ok(())
}

#[tokio::test]
async fn test_export_server_error_is_fatal() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/smash/export.jsf"))
    .respond_with(ResponseTemplate::new(500))
    .expect(1)
    .mount(&server)
    .await;

  let err = RecordFetcher::new(&mock_config(&server, 2))?.fetch("diva2:1").await.unwrap_err();
  assert!(matches!(err, DivaError::UpstreamStatus { status: 500, .. }));
  Ok(())
}
