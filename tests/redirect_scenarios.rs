//! End-to-end decision scenarios against the engine API.

mod common;

use std::sync::Arc;

use axum::http::{header, StatusCode};
use chrono::{DateTime, Duration, Utc};

use common::{engine, engine_with, options, outcome, request, rule};
use redirect_engine::engine::decision::http_date;
use redirect_engine::engine::options::OptionValue;
use redirect_engine::http::response::decision_response;
use redirect_engine::routing::matcher::RuleMatch;
use redirect_engine::{
    EngineCache, Hook, RedirectDecision, RedirectError, RedirectRequest, RedirectRule, RuleId,
};

#[test]
fn test_full_url_destination() {
    let rules = vec![rule("/", "https://example.com?new=querystring")];
    let (status, location) = outcome(&engine("https://localhost", rules));

    assert_eq!(status, Some(302));
    assert_eq!(location.as_deref(), Some("https://example.com/?new=querystring"));
}

#[test]
fn test_full_url_combined_query() {
    let rules = vec![rule("/", "https://example.com?new=querystring")];
    let (status, location) = outcome(&engine("https://localhost/?query=string", rules));

    assert_eq!(status, Some(302));
    assert_eq!(
        location.as_deref(),
        Some("https://example.com/?new=querystring&query=string")
    );
}

#[test]
fn test_disabled_never_redirects() {
    let mut opts = options();
    opts.enabled = false;
    opts.force_https = true;
    let engine = engine_with("http://localhost/", vec![rule("/", "/root")], opts);

    assert_eq!(outcome(&engine), (None, None));
}

#[test]
fn test_force_https_on_rule_match() {
    let mut opts = options();
    opts.force_https = true;
    let engine = engine_with("http://localhost/", vec![rule("/", "/root")], opts);

    let decision = engine.process();
    assert_eq!(decision.status(), Some(StatusCode::FOUND));
    assert_eq!(decision.location().unwrap().scheme(), "https");
    assert!(matches!(decision, RedirectDecision::Rule(_)));
}

#[test]
fn test_set_force_https_between_passes() {
    let mut engine = engine("http://localhost/", vec![]);
    assert_eq!(outcome(&engine), (None, None));

    engine.set_force_https(true);
    assert!(engine.force_https());

    let decision = engine.process();
    assert!(matches!(decision, RedirectDecision::Scheme(_)));
    assert_eq!(decision.status(), Some(StatusCode::FOUND));
    assert_eq!(decision.location().unwrap().as_str(), "https://localhost/");
}

#[test]
fn test_unknown_option() {
    let engine = engine("https://localhost/nomatch?query=string", vec![]);

    assert_eq!(
        engine.option("nonexistant"),
        Err(RedirectError::UnknownOption("nonexistant".into()))
    );
    assert_eq!(engine.option("forcehttps"), Ok(OptionValue::Flag(false)));
    assert_eq!(engine.option("excludes"), Ok(OptionValue::Paths(vec![])));
}

#[test]
fn test_unknown_type_handler() {
    let engine = engine("https://localhost/nomatch?query=string", vec![]);

    assert!(matches!(
        engine.type_handler("wontfind"),
        Err(RedirectError::UnknownType(name)) if name == "wontfind"
    ));
    assert!(engine.type_handler("path").is_ok());
}

#[test]
fn test_no_rules() {
    let engine = engine("https://localhost/nomatch?query=string", vec![]);
    assert_eq!(outcome(&engine), (None, None));
}

#[test]
fn test_rule_with_unregistered_type_is_skipped() {
    let rules = vec![rule("/", "/root").with_type("notsupported")];
    assert_eq!(outcome(&engine("https://localhost/?query=string", rules)), (None, None));
}

#[test]
fn test_inactive_rule_is_skipped() {
    let rules = vec![
        rule("/", "/inactive").with_active(false),
        rule("/", "/active"),
    ];
    let (_, location) = outcome(&engine("https://localhost/", rules));
    assert_eq!(location.as_deref(), Some("https://localhost/active"));
}

#[test]
fn test_custom_handler_without_match() {
    let rules = vec![rule("/", "/root").with_type("handler")];
    let mut engine = engine("https://localhost/nomatch?query=string", rules);
    engine.set_type_handler(
        "handler",
        |_: &RedirectRule, _: &RedirectRequest| -> Option<RuleMatch> { None },
    );

    assert!(engine.type_handler("handler").is_ok());
    assert_eq!(outcome(&engine), (None, None));
}

#[test]
fn test_custom_handler_with_match() {
    let rules = vec![RedirectRule::new("legacy", "ignored", "https://example.com/legacy", 301)
        .with_type("host")];
    let mut engine = engine("https://old.example.com/anything", rules);
    engine.set_type_handler(
        "host",
        |rule: &RedirectRule, request: &RedirectRequest| -> Option<RuleMatch> {
            if request.url().host_str() != Some("old.example.com") {
                return None;
            }
            Some(RuleMatch {
                captures: Vec::new(),
                destination: url::Url::parse(&rule.destination).ok()?,
            })
        },
    );

    let (status, location) = outcome(&engine);
    assert_eq!(status, Some(301));
    assert_eq!(location.as_deref(), Some("https://example.com/legacy"));
}

#[test]
fn test_excluded_path() {
    let rules = vec![rule("/excluded", "/root")];

    let mut excluded = engine("https://localhost/excluded/?query=string", rules.clone());
    excluded.set_excludes(["/excluded"]);
    assert_eq!(outcome(&excluded), (None, None));

    let mut other = engine("https://localhost/excluded?query=string", rules);
    other.set_excludes(["/elsewhere"]);
    assert_eq!(outcome(&other).0, Some(302));
}

#[test]
fn test_non_matching_path() {
    let rules = vec![rule("/", "/root")];
    assert_eq!(outcome(&engine("https://localhost/nomatch?query=string", rules)), (None, None));
}

#[test]
fn test_root_redirect_merges_query() {
    let rules = vec![rule("/", "/root?new=querystring")];
    let (status, location) = outcome(&engine("https://localhost/?query=string", rules));

    assert_eq!(status, Some(302));
    assert_eq!(
        location.as_deref(),
        Some("https://localhost/root?new=querystring&query=string")
    );
}

#[test]
fn test_destination_trailing_slash_is_kept() {
    let rules = vec![rule("/", "/root/?new=querystring")];
    let (_, location) = outcome(&engine("https://localhost/?query=string", rules));
    assert_eq!(
        location.as_deref(),
        Some("https://localhost/root/?new=querystring&query=string")
    );
}

#[test]
fn test_source_query_is_ignored() {
    let rules = vec![rule("/wild/card/*/?old=querystring", "/root/?new=querystring")];
    let (status, location) = outcome(&engine("https://localhost/wild/card/random?query=string", rules));

    assert_eq!(status, Some(302));
    assert_eq!(
        location.as_deref(),
        Some("https://localhost/root/?new=querystring&query=string")
    );
}

#[test]
fn test_trailing_slash_on_source_or_request() {
    let expected = Some("https://localhost/root/?new=querystring&query=string");

    let rules = vec![rule("/trailing/", "/root/?new=querystring")];
    let (_, location) = outcome(&engine("https://localhost/trailing?query=string", rules));
    assert_eq!(location.as_deref(), expected);

    let rules = vec![rule("/trailing", "/root/?new=querystring")];
    let (_, location) = outcome(&engine("https://localhost/trailing/?query=string", rules));
    assert_eq!(location.as_deref(), expected);
}

#[test]
fn test_only_destination_has_query() {
    let rules = vec![rule("/", "/root/?key=newvalue")];
    let (_, location) = outcome(&engine("https://localhost", rules));
    assert_eq!(location.as_deref(), Some("https://localhost/root/?key=newvalue"));
}

#[test]
fn test_destination_query_wins_on_collision() {
    let rules = vec![rule("/", "/root/?key=newvalue")];
    let (_, location) = outcome(&engine("https://localhost/?key=value&other=value", rules));
    assert_eq!(
        location.as_deref(),
        Some("https://localhost/root/?key=newvalue&other=value")
    );
}

#[test]
fn test_wildcard_relative_destination() {
    let rules = vec![RedirectRule::new(2, "/wild/*/card", "/wildcard/*", 302)];
    let (status, location) = outcome(&engine("https://localhost/wild/test/card?query=string", rules));

    assert_eq!(status, Some(302));
    assert_eq!(location.as_deref(), Some("https://localhost/wildcard/test?query=string"));
}

#[test]
fn test_wildcard_absolute_destination() {
    let rules = vec![RedirectRule::new(
        1,
        "/fullurl/wild/*/card",
        "https://example.com/wildcard/*",
        302,
    )];
    let (_, location) = outcome(&engine(
        "https://localhost/fullurl/wild/test/card?query=string",
        rules,
    ));
    assert_eq!(location.as_deref(), Some("https://example.com/wildcard/test?query=string"));
}

#[test]
fn test_wildcard_without_placement() {
    let rules = vec![RedirectRule::new(3, "/nowc/wild/*/card", "https://example.com/wildcard", 302)];
    let (_, location) = outcome(&engine("https://localhost/nowc/wild/test/card?query=string", rules));
    assert_eq!(location.as_deref(), Some("https://example.com/wildcard?query=string"));
}

#[test]
fn test_wildcard_prefix_mismatch_falls_through() {
    let rules = vec![
        RedirectRule::new(3, "/nomatch/wild/*/card", "https://example.com/first", 301),
        RedirectRule::new(4, "/nowc/wild/*/card", "https://example.com/wildcard", 302),
    ];
    let decision = engine("https://localhost/nowc/wild/test/card?query=string", rules).process();

    assert_eq!(decision.status(), Some(StatusCode::FOUND));
    assert_eq!(
        decision.location().unwrap().as_str(),
        "https://example.com/wildcard?query=string"
    );
    assert_eq!(decision.redirect().unwrap().rule_id, Some(RuleId::Int(4)));
}

#[test]
fn test_first_match_wins() {
    let rules = vec![
        RedirectRule::new(1, "/page", "/first", 301),
        RedirectRule::new(2, "/page", "/second", 307),
    ];
    let (status, location) = outcome(&engine("https://localhost/page", rules));
    assert_eq!(status, Some(301));
    assert_eq!(location.as_deref(), Some("https://localhost/first"));
}

#[test]
fn test_non_redirect_status_falls_back() {
    let rules = vec![RedirectRule::new(1, "/", "/root", 200)];
    assert_eq!(outcome(&engine("https://localhost/", rules)).0, Some(302));
}

#[test]
fn test_no_cache_headers() {
    let rules = vec![rule("/", "/root")];
    let decision = engine("https://localhost/?query=string", rules).process();
    assert_eq!(
        decision.location().unwrap().as_str(),
        "https://localhost/root?query=string"
    );

    let response = decision_response(decision).unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let headers = response.headers();
    assert_eq!(headers[header::CACHE_CONTROL], "no-store,no-cache");
    assert_eq!(headers[header::PRAGMA], "no-cache");

    let expires = headers[header::EXPIRES].to_str().unwrap();
    let expires = DateTime::parse_from_rfc2822(&expires.replace("GMT", "+0000"))
        .unwrap()
        .with_timezone(&Utc);
    assert!(expires < Utc::now());
    assert!(expires > Utc::now() - Duration::days(2));
}

#[test]
fn test_http_date_format() {
    let at = DateTime::parse_from_rfc3339("2024-03-05T07:08:09Z")
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(http_date(&at), "Tue, 05 Mar 2024 07:08:09 GMT");
}

#[test]
fn test_relative_destination_without_wildcard() {
    let rules = vec![rule("/wild/*/card", "/wildcard")];
    let (_, location) = outcome(&engine("https://localhost/wild/test/card?query=string", rules));
    assert_eq!(location.as_deref(), Some("https://localhost/wildcard?query=string"));
}

#[test]
fn test_forcing_https_drops_default_port() {
    let rules = vec![rule("/wild/*/card", "/wildcard")];
    let mut engine = engine("http://localhost:80/wild/test/card?query=string", rules);
    engine.set_force_https(true);
    assert!(engine.force_https());

    let (status, location) = outcome(&engine);
    assert_eq!(status, Some(302));
    assert_eq!(location.as_deref(), Some("https://localhost/wildcard?query=string"));
}

#[test]
fn test_force_https_without_match_redirects_request() {
    let rules = vec![rule("/wild/*/card", "/wildcard")];
    let mut engine = engine("http://localhost/notmatched?query=string", rules);
    engine.set_force_https(true);

    let (status, location) = outcome(&engine);
    assert_eq!(status, Some(302));
    assert_eq!(location.as_deref(), Some("https://localhost/notmatched?query=string"));
}

#[test]
fn test_force_https_keeps_non_default_port() {
    let mut engine = engine("http://localhost:8080/page", vec![]);
    engine.set_force_https(true);

    let (_, location) = outcome(&engine);
    assert_eq!(location.as_deref(), Some("https://localhost:8080/page"));
}

#[test]
fn test_available_hooks() {
    let engine = engine("http://localhost:80/wild/test/card?query=string", vec![]);
    let names: Vec<&str> = engine.hooks_available().iter().map(Hook::as_str).collect();
    assert!(names.contains(&"pre_redirect_filter"));
}

#[test]
fn test_identity_hook_and_emit() {
    let rules = vec![rule("/wild/*/card", "/wildcard/*")];
    let mut engine = engine("https://localhost/wild/test/card?query=string", rules);
    engine
        .set_hook("pre_redirect_filter", |request: RedirectRequest| request)
        .unwrap();

    let decision = engine.process();
    assert_eq!(
        decision.location().unwrap().as_str(),
        "https://localhost/wildcard/test?query=string"
    );
    let response = decision_response(decision).unwrap();
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://localhost/wildcard/test?query=string"
    );
}

#[test]
fn test_hook_leaves_stored_request_unchanged() {
    let rules = vec![rule("/moved", "/target")];
    let mut engine = engine("https://localhost/original", rules);
    engine
        .set_hook("pre_redirect_filter", |request: RedirectRequest| {
            let url = url::Url::parse("https://localhost/moved").unwrap();
            request.with_url(url)
        })
        .unwrap();

    let first = engine.process();
    let second = engine.process();
    assert_eq!(first.location(), second.location());
    assert_eq!(first.location().unwrap().path(), "/target");
    assert_eq!(engine.request().path(), "/original");
}

#[test]
fn test_unknown_hook_name() {
    let mut engine = engine("https://localhost/", vec![]);
    let result = engine.set_hook("post_redirect", |request: RedirectRequest| request);
    assert!(matches!(result, Err(RedirectError::UnknownHook(_))));
}

#[test]
fn test_factory_returns_cached_instance() {
    let cache = EngineCache::new();
    let rules: Arc<[RedirectRule]> = vec![rule("/", "/root")].into();

    let first = cache.factory(
        request("https://localhost/nomatch?query=string"),
        rules.clone(),
        options(),
    );
    let again = cache.factory(
        request("https://localhost/nomatch?query=string"),
        vec![rule("/", "/root")],
        options(),
    );
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(cache.len(), 1);

    let other = cache.factory(request("https://localhost/other"), rules, options());
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(cache.len(), 2);
}
