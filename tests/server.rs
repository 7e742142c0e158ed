//! HTTP surface tests: a mock upstream serves the XML feed and the router
//! is driven in-process.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use imovel_gateway::feed::HttpFeed;
use imovel_gateway::server::router;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListingDataFeed xmlns="http://www.vivareal.com/schemas/1.0/VRSync">
  <Header>
    <Provider>Imobiliária Exemplo</Provider>
  </Header>
  <Listings>
    <Listing>
      <ListingID>A1</ListingID>
      <Title>Apartamento no Batel</Title>
      <TransactionType>For Sale</TransactionType>
      <Details>
        <PropertyType>Residential / Apartment</PropertyType>
        <Description>Sacada com churrasqueira</Description>
        <ListPrice currency="BRL">650000</ListPrice>
        <LivingArea unit="square metres">90</LivingArea>
        <Bedrooms>3</Bedrooms>
        <Features>
          <Feature>Piscina</Feature>
          <Feature>Elevador</Feature>
        </Features>
      </Details>
      <Location>
        <City>Curitiba</City>
        <Neighborhood>Batel</Neighborhood>
      </Location>
    </Listing>
    <Listing>
      <ListingID>A2</ListingID>
      <Title>Casa em Santa Felicidade</Title>
      <TransactionType>For Rent</TransactionType>
      <Details>
        <PropertyType>Residential / Home</PropertyType>
        <RentalPrice currency="BRL" period="Monthly">3500</RentalPrice>
        <Bedrooms>4</Bedrooms>
        <Features>
          <Feature>Jardim</Feature>
        </Features>
      </Details>
      <Location>
        <City>Curitiba</City>
        <Neighborhood>Santa Felicidade</Neighborhood>
      </Location>
    </Listing>
  </Listings>
</ListingDataFeed>"#;

const SINGLE_FEED: &str = r#"<ListingDataFeed><Listings><Listing>
  <ListingID>S1</ListingID><Location><City>Londrina</City></Location>
</Listing></Listings></ListingDataFeed>"#;

async fn mock_feed(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

async fn get(server: &MockServer, uri: &str) -> (StatusCode, Value) {
    let feed = HttpFeed::new(format!("{}/feed.xml", server.uri()), Duration::from_secs(5)).unwrap();
    let app = router(Arc::new(feed));

    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn ids(body: &Value) -> Vec<&str> {
    body["Listings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["ListingID"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn home_is_plain_text() {
    let server = mock_feed(200, FEED).await;
    let (status, body) = get(&server, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn convert_xml_returns_tree() {
    let server = mock_feed(200, FEED).await;
    let (status, body) = get(&server, "/convert-xml").await;
    assert_eq!(status, StatusCode::OK);

    let listings = &body["ListingDataFeed"]["Listings"]["Listing"];
    assert_eq!(listings.as_array().map(Vec::len), Some(2));
    assert_eq!(listings[0]["Details"]["ListPrice"]["@currency"], "BRL");
    assert_eq!(listings[0]["Details"]["ListPrice"]["#text"], "650000");
    assert_eq!(listings[1]["Details"]["Features"]["Feature"], "Jardim");
}

#[tokio::test]
async fn convert_xml_mirrors_upstream_failure() {
    let server = mock_feed(503, "down").await;
    let (status, body) = get(&server, "/convert-xml").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Falha ao obter dados da API");
}

#[tokio::test]
async fn query_filters_and_pages() {
    let server = mock_feed(200, FEED).await;

    let (status, body) = get(&server, "/imoveis?cidade=curitiba&finalidade=venda").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["total_paginas"], 1);
    assert_eq!(ids(&body), vec!["A1"]);

    let (_, body) = get(&server, "/imoveis?caracteristicas=jardim").await;
    assert_eq!(ids(&body), vec!["A2"]);

    let (_, body) = get(&server, "/imoveis?ordenar_por=preco&itens_por_pagina=1").await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["total_paginas"], 2);
    assert_eq!(body["itens_por_pagina"], 1);
    assert_eq!(ids(&body), vec!["A2"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn conversion_and_query_run_on_blocking_pool() {
    let server = mock_feed(200, FEED).await;

    let (status, tree) = get(&server, "/convert-xml").await;
    assert_eq!(status, StatusCode::OK);
    assert!(tree["ListingDataFeed"]["Listings"]["Listing"].is_array());

    let (status, body) = get(&server, "/imoveis?ordenar_por=area&ordem=decrescente").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["A1", "A2"]);
}

#[tokio::test]
async fn query_accepts_encoded_accents() {
    let server = mock_feed(200, FEED).await;
    let (_, body) = get(&server, "/imoveis?bairro=Santa%2520Felicidade").await;
    assert_eq!(ids(&body), vec!["A2"]);
}

#[tokio::test]
async fn single_listing_feed() {
    let server = mock_feed(200, SINGLE_FEED).await;
    let (status, body) = get(&server, "/imoveis").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(ids(&body), vec!["S1"]);
}

#[tokio::test]
async fn upstream_failure_yields_error_envelope() {
    let server = mock_feed(404, "missing").await;
    let (status, body) = get(&server, "/imoveis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Falha ao obter dados da API");
    assert_eq!(body["total"], 0);
    assert_eq!(body["pagina"], 1);
    assert_eq!(body["itens_por_pagina"], 10);
    assert_eq!(body["total_paginas"], 0);
    assert_eq!(body["Listings"], serde_json::json!([]));
}

#[tokio::test]
async fn malformed_xml_is_bad_gateway() {
    let server = mock_feed(200, "<ListingDataFeed><Listings>").await;
    let (status, body) = get(&server, "/imoveis").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}
