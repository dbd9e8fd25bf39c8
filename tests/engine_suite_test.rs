mod common;

use mmode_probe::config::ProbeConfig;
use mmode_probe::engine::cases::{pubmed_cases, RedirectCase};
use mmode_probe::engine::suite::{run_case, run_suite, CaseOutcome};
use mmode_probe::engine::verify::{verify_direct, verify_redirect, verify_served, VerifyError};
use mmode_probe::network::client::RedirectProber;
use mmode_probe::network::cookies::{CookiePreset, SiteMode};

fn prober_for(base_url: &str) -> RedirectProber {
    RedirectProber::new(ProbeConfig::with_base_url(base_url).unwrap())
}

// * Scenarios

#[tokio::test]
async fn test_homepage_with_mobile_emulation_redirects_to_mobile() {
    let server = common::start().await;
    let prober = prober_for(&server.base_url);

    let result = prober.probe_path("/pubmed?p$mobile=true", None).await.unwrap();
    let hop = result.first_redirect().expect("missing redirect");
    assert_eq!(hop.status_code, 303);
    verify_redirect(&result, "/m/pubmed/").unwrap();
}

#[tokio::test]
async fn test_search_target_independent_of_param_order() {
    let server = common::start().await;
    let prober = prober_for(&server.base_url);

    for path in ["/pubmed?term=cat&p$mobile=true", "/pubmed?p$mobile=true&term=cat"] {
        let result = prober.probe_path(path, None).await.unwrap();
        verify_redirect(&result, "/m/pubmed/?term=cat").unwrap();
    }
}

#[tokio::test]
async fn test_standard_flag_overrides_mobile_cookie() {
    let server = common::start().await;
    let prober = prober_for(&server.base_url);

    let result = prober
        .probe_path("/pubmed?p$mobile=true&ncbi_mmode=std", Some(&CookiePreset::mobile()))
        .await
        .unwrap();
    verify_redirect(&result, "/pubmed").unwrap();
}

#[tokio::test]
async fn test_plain_homepage_is_served_directly() {
    let server = common::start().await;
    let prober = prober_for(&server.base_url);

    let result = prober.probe_path("/pubmed", None).await.unwrap();
    verify_direct(&result).unwrap();
    assert!(result.history.is_empty());
}

#[tokio::test]
async fn test_standard_cookie_keeps_requested_url() {
    let server = common::start().await;
    let prober = prober_for(&server.base_url);

    let path = "/pubmed?term=whale&p$mobile=true";
    let result = prober
        .probe_path(path, Some(&CookiePreset::standard()))
        .await
        .unwrap();
    verify_served(&result, path).unwrap();
}

#[tokio::test]
async fn test_missing_redirect_is_reported() {
    let server = common::start().await;
    let prober = prober_for(&server.base_url);

    let result = prober.probe_path("/pubmed", None).await.unwrap();
    let err = verify_redirect(&result, "/m/pubmed/").unwrap_err();
    assert!(matches!(err, VerifyError::MissingRedirect { .. }));
}

// * Full table

#[tokio::test]
async fn test_every_pubmed_case_passes_against_fixture() {
    let server = common::start().await;
    let prober = prober_for(&server.base_url);
    let cases = pubmed_cases();

    let report = run_suite(&prober, &cases).await;

    let failures: Vec<_> = report
        .cases
        .iter()
        .filter(|c| c.outcome != CaseOutcome::Passed)
        .map(|c| format!("{}: {:?}", c.name, c.outcome))
        .collect();
    assert!(failures.is_empty(), "{:#?}", failures);
    assert!(report.all_passed());
    assert_eq!(report.passed, cases.len());
    assert_eq!(report.base_url, server.base_url);
}

#[tokio::test]
async fn test_wrong_expectation_fails_case() {
    let server = common::start().await;
    let prober = prober_for(&server.base_url);

    let case = RedirectCase::see_other(
        "wrong_target",
        "/pubmed/17328369?p$mobile=true",
        "/m/pubmed/1/",
        None,
    );
    let report = run_case(&prober, &case).await;
    match report.outcome {
        CaseOutcome::Failed(reason) => assert!(reason.contains("/m/pubmed/17328369/")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_host_errors_case() {
    let prober = prober_for(&common::refused_base_url());
    let case = RedirectCase::served("unreachable", "/m/pubmed/", Some(SiteMode::Mobile));

    let report = run_case(&prober, &case).await;
    assert_eq!(report.outcome.label(), "errored");

    let suite = run_suite(&prober, &[case]).await;
    assert_eq!(suite.errored, 1);
    assert!(!suite.all_passed());
}
