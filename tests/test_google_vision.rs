use dilloscan::{GoogleVisionRecognizer, ImageSource, ScanError, Scanner, TextRecognizer};
use mockito::Matcher;

const ANNOTATE_PATH: &str = "/v1/images:annotate";

fn vision_body(text: &str) -> String {
    serde_json::json!({
        "responses": [{
            "fullTextAnnotation": { "text": text }
        }]
    })
    .to_string()
}

fn recognizer(server: &mockito::Server) -> GoogleVisionRecognizer {
    GoogleVisionRecognizer::new("test-key", None)
        .unwrap()
        .with_endpoint(format!("{}{}", server.url(), ANNOTATE_PATH))
}

#[tokio::test]
async fn test_recognize_sends_text_detection_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", ANNOTATE_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("TEXT_DETECTION".into()),
            Matcher::Regex("aGVsbG8=".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(vision_body("Ingredients: Sugar, Salt\n"))
        .create_async()
        .await;

    let text = recognizer(&server)
        .recognize(&ImageSource::Base64("aGVsbG8=".to_string()))
        .await
        .unwrap();

    assert_eq!(text, "Ingredients: Sugar, Salt\n");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_error_is_recognition_failure() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", ANNOTATE_PATH)
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body("API key not valid")
        .create_async()
        .await;

    let result = recognizer(&server)
        .recognize(&ImageSource::Base64("aGVsbG8=".to_string()))
        .await;

    match result {
        Err(ScanError::RecognitionFailed(message)) => {
            assert!(message.contains("403"));
            assert!(message.contains("API key not valid"));
        }
        other => panic!("expected recognition failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_annotation_is_recognition_failure() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", ANNOTATE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(vision_body("  \n "))
        .create_async()
        .await;

    let result = recognizer(&server)
        .recognize(&ImageSource::Base64("aGVsbG8=".to_string()))
        .await;
    assert!(matches!(result, Err(ScanError::RecognitionFailed(_))));
}

#[tokio::test]
async fn test_missing_annotation_is_recognition_failure() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", ANNOTATE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"responses": [{}]}"#)
        .create_async()
        .await;

    let result = recognizer(&server)
        .recognize(&ImageSource::Base64("aGVsbG8=".to_string()))
        .await;
    assert!(matches!(result, Err(ScanError::RecognitionFailed(_))));
}

#[tokio::test]
async fn test_builder_scans_image_file_through_vision() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", ANNOTATE_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "builder-key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(vision_body(
            "Ingredients: Whole Grain Oats, Sugar (cane), Salt\nAllergens: may contain nuts",
        ))
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("label.png");
    std::fs::write(&image_path, b"\x89PNG fake label").unwrap();

    let result = Scanner::builder()
        .image(image_path.to_string_lossy())
        .api_key("builder-key")
        .ocr_endpoint(format!("{}{}", server.url(), ANNOTATE_PATH))
        .build()
        .await
        .unwrap();

    assert_eq!(
        result.ingredients.as_slice(),
        ["Whole Grain Oats", "Sugar", "Salt"]
    );
    assert_eq!(result.source, image_path.to_string_lossy());
}

#[tokio::test]
async fn test_failed_recognition_never_reaches_extractor() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", ANNOTATE_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let result = Scanner::builder()
        .base64("aGVsbG8=")
        .api_key("k")
        .ocr_endpoint(format!("{}{}", server.url(), ANNOTATE_PATH))
        .build()
        .await;

    assert!(matches!(result, Err(ScanError::RecognitionFailed(_))));
}
