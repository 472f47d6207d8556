use mnemopack::youtube::{
    CaptionTrack, TranscriptSource, YoutubeTranscripts, choose_track, flatten_transcript,
    parse_caption_tracks, parse_transcript_xml,
};
use spectral::prelude::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VIDEO_ID: &str = "dQw4w9WgXcQ";

const TRANSCRIPT_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="utf-8" ?><transcript>"#,
    r#"<text start="0.5" dur="1.25">Hey &amp;#39;there&amp;#39;</text>"#,
    r#"<text start="2" dur="3.1">&lt;font color=&quot;#E5E5E5&quot;&gt;second&lt;/font&gt; line</text>"#,
    r#"<text start="5.1" dur="2">Fish &amp;amp; chips</text>"#,
    r#"</transcript>"#
);

fn watch_page(tracks_json: &str) -> String {
    format!(
        r#"<html><script>var ytInitialPlayerResponse = {{"playabilityStatus":{{"status":"OK"}},"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":{tracks_json},"audioTracks":[{{"captionTrackIndices":[0]}}]}}}},"videoDetails":{{"videoId":"{VIDEO_ID}"}}}};</script></html>"#
    )
}

fn track(language_code: &str, kind: Option<&str>) -> CaptionTrack {
    CaptionTrack {
        base_url: format!("https://example.com/{language_code}"),
        language_code: language_code.to_string(),
        kind: kind.map(ToString::to_string),
    }
}

#[test]
fn transcript_xml_is_decoded_twice() {
    let entries = parse_transcript_xml(TRANSCRIPT_XML);

    let texts: Vec<&str> = entries.iter().map(|entry| entry.text.as_str()).collect();
    assert_that(&texts).is_equal_to(vec!["Hey 'there'", "second line", "Fish & chips"]);
    assert_that(&entries.first().map(|entry| (entry.start, entry.duration)))
        .is_equal_to(Some((0.5, 1.25)));
}

#[test]
fn flattened_transcript_drops_timing() {
    let text = flatten_transcript(&parse_transcript_xml(TRANSCRIPT_XML));

    assert_that(&text).is_equal_to("Hey 'there'\nsecond line\nFish & chips".to_string());
}

#[test]
fn caption_tracks_are_read_from_watch_page() {
    let page = watch_page(
        r#"[{"baseUrl":"https://example.com/api/timedtext?v=x&lang=en","name":{"runs":[{"text":"English"}]},"languageCode":"en","isTranslatable":true}]"#,
    );

    let tracks = parse_caption_tracks(&page).expect("Expected caption tracks.");

    assert_that(&tracks).is_equal_to(vec![CaptionTrack {
        base_url: "https://example.com/api/timedtext?v=x&lang=en".to_string(),
        language_code: "en".to_string(),
        kind: None,
    }]);
}

#[test]
fn page_without_captions_fails() {
    let page = r#"<html><script>var ytInitialPlayerResponse = {"videoDetails":{}};</script></html>"#;

    assert_that(&parse_caption_tracks(page).is_err()).is_true();
}

#[test]
fn rate_limited_page_fails() {
    let page = r#"<html><div class="g-recaptcha"></div></html>"#;

    assert_that(&parse_caption_tracks(page).is_err()).is_true();
}

#[test]
fn manual_track_is_preferred_over_generated() {
    let tracks = vec![track("de", None), track("en", Some("asr")), track("en", None)];

    let chosen = choose_track(&tracks, &["en".to_string()]);

    assert_that(&chosen).is_equal_to(Some(&track("en", None)));
}

#[test]
fn generated_track_is_used_when_no_manual_one() {
    let tracks = vec![track("de", None), track("en", Some("asr"))];

    let chosen = choose_track(&tracks, &["en".to_string()]);

    assert_that(&chosen).is_equal_to(Some(&track("en", Some("asr"))));
}

#[test]
fn first_track_is_fallback() {
    let tracks = vec![track("de", None), track("fr", None)];

    let chosen = choose_track(&tracks, &["en".to_string()]);

    assert_that(&chosen).is_equal_to(Some(&track("de", None)));
}

#[tokio::test]
async fn transcript_is_fetched_from_watch_page_track() {
    let server = MockServer::start().await;
    let tracks_json = format!(
        r#"[{{"baseUrl":"{}/api/timedtext?v={VIDEO_ID}&lang=en&fmt=srv3","languageCode":"en"}}]"#,
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/watch"))
        .and(query_param("v", VIDEO_ID))
        .respond_with(ResponseTemplate::new(200).set_body_string(watch_page(&tracks_json)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TRANSCRIPT_XML))
        .expect(1)
        .mount(&server)
        .await;

    let source = YoutubeTranscripts::new(reqwest::Client::new()).with_base_url(&server.uri());
    let entries = source.fetch(VIDEO_ID).await.expect("Expected a transcript.");

    assert_that(&entries.len()).is_equal_to(3);
}

#[tokio::test]
async fn unavailable_video_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/watch"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = YoutubeTranscripts::new(reqwest::Client::new()).with_base_url(&server.uri());

    assert_that(&source.fetch(VIDEO_ID).await.is_err()).is_true();
}
