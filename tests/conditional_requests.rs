use http_cache_util::message::HttpMessage;
use http_cache_util::{CacheUtil, FixedClock, RequestCacheControl, ResponseCacheControl};
use hyper::{Request, Response, StatusCode};

// Mon, 10 Aug 2015 18:30:12 GMT
const NOW: i64 = 1_439_231_412;

fn util() -> CacheUtil<FixedClock> {
    CacheUtil::with_clock(FixedClock::at(NOW).unwrap())
}

fn annotated_response() -> Response<()> {
    let util = util();
    let response = util.with_cache(Response::new(()), true, 120);
    let response = util.with_etag(response, "v1", false);
    let response = util
        .with_last_modified(response, "Mon, 10 Aug 2015 12:00:00 GMT")
        .unwrap();
    util.with_relative_expires(response, 120).unwrap()
}

#[test]
fn annotated_response_round_trips_through_headers() {
    let response = annotated_response();
    assert_eq!(response.header_line("Cache-Control"), "public, max-age=120");
    assert_eq!(response.header_line("ETag"), "\"v1\"");
    assert_eq!(response.header_line("Expires"), "Mon, 10 Aug 2015 18:32:12 GMT");

    let util = util();
    assert!(util.is_cacheable(&response));
    assert!(util.has_state_validator(&response));
    assert_eq!(util.lifetime(&response), Some(120));
    assert_eq!(util.age(&response), None);
    assert_eq!(util.is_fresh(&response), Some(true));
}

#[test]
fn revalidation_with_etag_and_dates() {
    let response = annotated_response();
    let util = util();

    let etag_request = Request::get("/").header("If-None-Match", "\"v0\", W/\"v1\"").body(()).unwrap();
    assert!(util.is_not_modified(&etag_request, &response));

    let stale_etag = Request::get("/")
        .header("If-None-Match", "\"v0\"")
        .header("If-Modified-Since", "Mon, 10 Aug 2015 18:00:00 GMT")
        .body(())
        .unwrap();
    assert!(!util.is_not_modified(&stale_etag, &response));

    let date_request = Request::get("/")
        .header("If-Modified-Since", "Mon, 10 Aug 2015 12:00:00 GMT")
        .body(())
        .unwrap();
    assert!(util.is_not_modified(&date_request, &response));

    let older_copy = Request::get("/")
        .header("If-Modified-Since", "Mon, 10 Aug 2015 11:59:59 GMT")
        .body(())
        .unwrap();
    assert!(!util.is_not_modified(&older_copy, &response));

    let put = Request::put("/")
        .header("If-Modified-Since", "Mon, 10 Aug 2015 12:00:00 GMT")
        .body(())
        .unwrap();
    assert!(!util.is_not_modified(&put, &response));
}

#[test]
fn shared_max_age_beats_max_age_and_age_ages_out() {
    let util = util();
    let control = ResponseCacheControl::new()
        .with_public(true)
        .with_max_age(60)
        .with_shared_max_age(200);
    let response = util.with_cache_control(Response::new(()), control);
    assert_eq!(util.lifetime(&response), Some(200));

    let aged = Response::builder()
        .header("Cache-Control", response.header_line("Cache-Control"))
        .header("Date", "Mon, 10 Aug 2015 18:25:00 GMT")
        .body(())
        .unwrap();
    // 312 seconds old, 200 seconds lifetime
    assert_eq!(util.age(&aged), Some(312));
    assert_eq!(util.is_fresh(&aged), Some(false));
}

#[test]
fn uncacheable_responses() {
    let util = util();
    let prevented = util.with_cache_prevention(Response::new(()));
    assert!(!util.is_cacheable(&prevented));
    assert_eq!(util.lifetime(&prevented), None);

    let mut created = Response::new(());
    *created.status_mut() = StatusCode::CREATED;
    assert!(!util.is_cacheable(&created));
}

#[test]
fn request_directives_parse_from_request_headers() {
    let request = Request::get("/")
        .header("Cache-Control", "max-age=0")
        .header("Cache-Control", "min-fresh=30, max-stale")
        .body(())
        .unwrap();
    let control = RequestCacheControl::parse_or_empty(&request.header_line("Cache-Control"));
    assert_eq!(control.max_age(), Some(0));
    assert_eq!(control.min_fresh(), Some(30));
    assert_eq!(control.max_stale(), Some(u64::MAX));
}
