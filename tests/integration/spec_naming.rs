//! Integration tests for case names

use super::test_utils::names;
use givens::config::NamingConfig;
use givens::{LineEnding, Spec};

const EXPECTED_NAME: &str = "given a context\r\n  and a sub context\r\n  and another sub context\r\n  but yet another sub context\r\nwhen running the test\r\nthen the test passes\r\n";

fn naming_spec() -> Spec {
    Spec::new("SpecNaming").behavior("run_spec", |s| {
        s.when("running the test", || Ok(()));
        s.given("a context", || {})?.attach(|s| {
            s.given("a sub context", || {})?.attach(|s| {
                s.and("another sub context", || {})?.attach(|s| {
                    s.but("yet another sub context", || {})?.attach(|s| {
                        s.then("the test passes", || Ok(()));
                        Ok(())
                    });
                    Ok(())
                });
                Ok(())
            });
            Ok(())
        });
        Ok(())
    })
}

#[test]
fn test_nested_chain_name_is_exact() {
    let cases = naming_spec().cases().unwrap();
    assert_eq!(names(&cases), vec![EXPECTED_NAME.to_string()]);
}

#[test]
fn test_lf_line_endings_from_config() {
    let naming = NamingConfig {
        line_ending: LineEnding::Lf,
    };
    let cases = naming_spec().with_naming(&naming).cases().unwrap();
    assert_eq!(cases[0].name(), EXPECTED_NAME.replace("\r\n", "\n"));
}

#[test]
fn test_but_first_still_reads_given() {
    let spec = Spec::new("Contrast").line_ending(LineEnding::Lf).behavior("b", |s| {
        s.when("paying", || Ok(()));
        s.but("the card is expired", || {})?.attach(|s| {
            s.then("payment is refused", || Ok(()));
            Ok(())
        });
        Ok(())
    });
    assert_eq!(
        spec.cases().unwrap()[0].name(),
        "given the card is expired\nwhen paying\nthen payment is refused\n"
    );
}

#[test]
fn test_unnamed_contexts_are_hidden_from_names() {
    let spec = Spec::new("Hidden").line_ending(LineEnding::Lf).behavior("b", |s| {
        s.when("logging in", || Ok(()));
        s.given_unnamed(|| {}).attach(|s| {
            s.given("a registered user", || {})?.attach(|s| {
                s.given_unnamed(|| {}).attach(|s| {
                    s.then("a session starts", || Ok(()));
                    Ok(())
                });
                Ok(())
            });
            Ok(())
        });
        Ok(())
    });

    let cases = spec.cases().unwrap();
    assert_eq!(
        cases[0].name(),
        "given a registered user\nwhen logging in\nthen a session starts\n"
    );
    // before-hook context, two unnamed and one named
    assert_eq!(cases[0].path().len(), 4);
}

#[test]
fn test_variants_render_with_inherited_conjunction() {
    let spec = Spec::new("Variants").line_ending(LineEnding::Lf).behavior("b", |s| {
        s.when("shipping", || Ok(()));
        s.given("an order", || {})?.attach(|s| {
            s.but("the address is missing", || {})?
                .or("the address is invalid", || {})?
                .attach(|s| {
                    s.then("shipping is blocked", || Ok(()));
                    Ok(())
                });
            Ok(())
        });
        Ok(())
    });

    assert_eq!(
        names(&spec.cases().unwrap()),
        vec![
            "given an order\n  but the address is missing\nwhen shipping\nthen shipping is blocked\n"
                .to_string(),
            "given an order\n  but the address is invalid\nwhen shipping\nthen shipping is blocked\n"
                .to_string(),
        ]
    );
}
