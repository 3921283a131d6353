mod common;

use common::TestServer;
use listing_photo_uploader::api::UploadClient;
use listing_photo_uploader::form::{build_payload, display_order_field, image_field};
use listing_photo_uploader::photos::locate_photos;
use reqwest::StatusCode;
use std::time::Duration;
use tempfile::TempDir;

fn client() -> UploadClient {
    UploadClient::new(Some(Duration::from_secs(10))).unwrap()
}

#[test]
fn test_put_sends_token_boundary_and_ordered_fields() {
    let server = TestServer::start();
    let root = TempDir::new().unwrap();
    common::write_photos(
        root.path(),
        "p42",
        &[("photo2.jpg", b"second"), ("photo1.jpg", b"first")],
    );

    let photos = locate_photos(root.path(), "p42").unwrap();
    let payload = build_payload("active", &photos);
    let url = format!("{}/manage/property_listings/l100", server.base_url());

    let outcome = client().upload_listing(&url, payload, "tok-abc").unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.skipped_files, 0);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, "PUT");
    assert_eq!(req.path, "/api/manage/property_listings/l100");
    assert_eq!(req.header("authorization"), Some("tok-abc"));
    assert!(req
        .header("content-type")
        .unwrap()
        .starts_with("multipart/form-data; boundary="));

    let names: Vec<String> = req.form_fields().into_iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        vec![
            image_field(0),
            display_order_field(0),
            image_field(1),
            display_order_field(1),
            "listing_type".to_string(),
        ]
    );

    let first = req.field(&image_field(0)).unwrap();
    assert_eq!(first.data, b"first");
    assert_eq!(first.filename.as_deref(), Some("photo1.jpg"));
    assert_eq!(req.field(&image_field(1)).unwrap().data, b"second");
    assert_eq!(req.field(&display_order_field(1)).unwrap().data, b"1");
    assert_eq!(req.field("listing_type").unwrap().data, b"active");
}

#[test]
fn test_non_success_status_is_returned_not_raised() {
    let server = TestServer::with_statuses(vec![422]);
    let url = format!("{}/manage/property_listings/l7", server.base_url());

    let outcome = client()
        .upload_listing(&url, build_payload("inactive", &[]), "tok")
        .unwrap();
    assert_eq!(outcome.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!outcome.is_success());
}

#[test]
fn test_empty_payload_sends_only_listing_type() {
    let server = TestServer::start();
    let url = format!("{}/manage/property_listings/l8", server.base_url());

    client()
        .upload_listing(&url, build_payload("sold", &[]), "tok")
        .unwrap();

    let fields = server.requests()[0].form_fields();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "listing_type");
    assert_eq!(fields[0].data, b"sold");
}

#[test]
fn test_unopenable_photo_is_left_out() {
    let server = TestServer::start();
    let root = TempDir::new().unwrap();
    let dir = common::write_photos(root.path(), "p9", &[("a.jpg", b"a"), ("b.jpg", b"b")]);

    let photos = locate_photos(root.path(), "p9").unwrap();
    std::fs::remove_file(dir.join("b.jpg")).unwrap();

    let url = format!("{}/manage/property_listings/l9", server.base_url());
    let outcome = client()
        .upload_listing(&url, build_payload("active", &photos), "tok")
        .unwrap();
    assert_eq!(outcome.skipped_files, 1);

    let req = &server.requests()[0];
    assert_eq!(req.field(&image_field(0)).unwrap().data, b"a");
    assert!(req.field(&image_field(1)).is_none());
    assert_eq!(req.field(&display_order_field(1)).unwrap().data, b"1");
}
