use diva::{client::DivaClient, listing::ListingCrawler};
use futures::TryStreamExt;

use super::*;

#[traced_test]
#[tokio::test]
async fn test_identifiers_follow_page_and_document_order() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_listing(&server, 1, &["diva2:3", "diva2:1"]).await;
  mount_listing(&server, 3, &["diva2:2"]).await;

  let config = mock_config(&server, 5);
  let crawler = ListingCrawler::new(&config, DivaClient::new(&config)?)?;
  let ids: Vec<String> = crawler.identifiers().try_collect().await?;

  assert_eq!(ids, ["diva2:3", "diva2:1", "diva2:2"]);
  Ok(())
}

#[tokio::test]
async fn test_subject_page_request_carries_category_and_size() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/smash/resultList.jsf"))
    .and(query_param("p", "1"))
    .and(query_param("noOfRows", "2"))
    .and(query_param("searchType", "SUBJECT"))
    .and(query_param("aq", r#"[[{"categoryId":"10264"}]]"#))
    .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&["diva2:9"])))
    .expect(1)
    .mount(&server)
    .await;

  let config = mock_config(&server, 2).with_category("10264").with_page_size(2);
  let crawler = ListingCrawler::new(&config, DivaClient::new(&config)?)?;
  let page = crawler.fetch_page(1).await?;

  assert_eq!(page.offset, 1);
  assert_eq!(page.identifiers, ["diva2:9"]);
  Ok(())
}

#[tokio::test]
async fn test_latest_listing_uses_latest_page() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/smash/latest.jsf"))
    .and(query_param("dswid", "-9944"))
    .and(query_param("p", "51"))
    .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&["diva2:7"])))
    .expect(1)
    .mount(&server)
    .await;

  let config = mock_config(&server, 2).with_listing_kind(ListingKind::Latest).with_range(51, 52);
  let crawler = ListingCrawler::new(&config, DivaClient::new(&config)?)?;
  let ids: Vec<String> = crawler.identifiers().try_collect().await?;

  assert_eq!(ids, ["diva2:7"]);
  Ok(())
}

#[tokio::test]
async fn test_non_ok_listing_status_is_fatal() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/smash/resultList.jsf"))
    .respond_with(ResponseTemplate::new(503))
    .expect(1)
    .mount(&server)
    .await;

  let config = mock_config(&server, 5).with_max_retries(Some(3));
  let crawler = ListingCrawler::new(&config, DivaClient::new(&config)?)?;
  let result: Result<Vec<String>, DivaError> = crawler.identifiers().try_collect().await;

  match result {
    Err(DivaError::UpstreamStatus { status, url }) => {
      assert_eq!(status, 503);
      assert!(url.contains("resultList.jsf"));
    },
    other => panic!("expected an upstream status error, got {other:?}"),
  }
  Ok(())
}

#[tokio::test]
async fn test_empty_page_yields_nothing() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_listing(&server, 1, &[]).await;

  let config = mock_config(&server, 2);
  let crawler = ListingCrawler::new(&config, DivaClient::new(&config)?)?;
  let ids: Vec<String> = crawler.identifiers().try_collect().await?;

  assert!(ids.is_empty());
  Ok(())
}
