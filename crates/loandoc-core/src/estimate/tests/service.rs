use super::common::*;
use crate::estimate::request::RequestError;
use crate::estimate::service::EstimateServiceError;
use crate::estimate::RuleSet;
use rust_decimal_macros::dec;

#[test]
fn unavailable_catalog_yields_no_banks() {
    let service = unavailable_service();

    let response = service.estimate(request()).expect("request is valid");

    assert!(response.banks.is_empty());
    assert!(service.lenders(RuleSet::Production).is_empty());
}

#[test]
fn invalid_request_is_rejected_before_lookup() {
    let service = unavailable_service();
    let mut request = request();
    request.visa_type = None;

    match service.estimate(request) {
        Err(EstimateServiceError::Request(RequestError::MissingFields(fields))) => {
            assert_eq!(fields, vec!["visaType"]);
        }
        other => panic!("expected missing field rejection, got {other:?}"),
    }
}

#[test]
fn test_mode_reads_the_test_catalog() {
    let service = builtin_service();
    let mut request = request();
    request.test_mode = Some(true);

    let response = service.estimate(request).expect("estimate");

    assert_eq!(response.banks.len(), 1);
    assert_eq!(response.banks[0].bank_name, "테스트은행1");
    // 2500 * 20 * 0.10 / 10
    assert_eq!(response.banks[0].estimated_limit, dec!(500));
}

#[test]
fn lender_listing_resolves_ranks_in_catalog_order() {
    let service = builtin_service();

    let lenders = service.lenders(RuleSet::Production);

    let ranks: Vec<(&str, i32)> = lenders
        .iter()
        .map(|lender| (lender.bank_name.as_str(), lender.rank))
        .collect();
    assert_eq!(
        ranks,
        vec![
            ("KB저축은행", 1),
            ("전북은행", 2),
            ("OK저축은행", 3),
            ("웰컴저축은행", 4),
            ("예가람저축은행", 5),
        ]
    );
    assert_eq!(lenders[0].allowed_visa_codes, vec!["E7", "E9", "F2", "F6", "F5"]);
}

#[test]
fn repeated_estimates_are_identical() {
    let service = service_with(vec![
        scenario_lender(),
        rated_lender("second", None, Some(dec!(11.0))),
    ]);

    let first = serde_json::to_string(&service.estimate(request()).expect("estimate"))
        .expect("serializes");
    let second = serde_json::to_string(&service.estimate(request()).expect("estimate"))
        .expect("serializes");

    assert_eq!(first, second);
}

#[test]
fn listing_ranks_agree_with_estimate_when_names_repeat() {
    let service = service_with(vec![
        rated_lender("A", None, Some(dec!(10.0))),
        rated_lender("A", None, Some(dec!(9.0))),
        rated_lender("B", None, Some(dec!(11.0))),
    ]);

    let listing: Vec<(String, i32)> = service
        .lenders(RuleSet::Production)
        .into_iter()
        .map(|lender| (lender.bank_name, lender.rank))
        .collect();
    let estimate: Vec<(String, Option<i32>)> = service
        .estimate(request())
        .expect("estimate")
        .banks
        .into_iter()
        .map(|bank| (bank.bank_name, bank.rank))
        .collect();

    assert_eq!(listing, vec![("A".to_string(), 2), ("B".to_string(), 3)]);
    assert_eq!(
        estimate,
        vec![("A".to_string(), Some(2)), ("B".to_string(), Some(3))]
    );
}
