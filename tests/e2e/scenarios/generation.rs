use crate::harness::{Assertion, Scenario};

#[test]
fn test_scopes_then_discovery_order() {
    Scenario::new("scopes_then_discovery_order")
        .with_file(
            "s2/pods_test.go",
            "// +docgenerator:pod:scenario=S2R1,successStates=A\n\
             // +docgenerator:pod:scenario=S2R2,successStates=B\n",
        )
        .with_file(
            "s1/pods_test.go",
            "// +docgenerator:pod:scenario=S1R1,successStates=A\n\
             // +docgenerator:pod:scenario=S1R2,successStates=B\n",
        )
        .generates()
        .assert_order(&["S1R1", "S1R2", "S2R1", "S2R2"])
        .run()
        .unwrap();
}

#[test]
fn test_duplicates_are_kept() {
    let marker = "// +docgenerator:pod:scenario=twice,successStates={Pending,Running}\n";
    Scenario::new("duplicates_are_kept")
        .with_file("pods/a_test.go", &format!("{}{}", marker, marker))
        .generates()
        .assert_order(&["twice", "twice"])
        .run()
        .unwrap();
}

#[test]
fn test_regenerate_replaces_document() {
    Scenario::new("regenerate_replaces_document")
        .with_file(
            "pods/a_test.go",
            "// +docgenerator:pod:scenario=first,successStates=Pending\n",
        )
        .generates()
        .assert_scenario_count(1)
        .writes_source(
            "pods/b_test.go",
            "// +docgenerator:pod:scenario=second,successStates=Running\n",
        )
        .generates()
        .assert_order(&["first", "second"])
        .removes_source("pods/a_test.go")
        .generates()
        .assert_order(&["second"])
        .assert(Assertion::ScenarioCount(1))
        .run()
        .unwrap();
}

#[test]
fn test_no_markers_writes_heading_only() {
    Scenario::new("no_markers")
        .with_file("pods/a_test.go", "package pods\n")
        .generates()
        .assert(Assertion::Custom(Box::new(|doc| {
            anyhow::ensure!(doc == "# POD CONDITION TESTS\n\n", "unexpected document: {:?}", doc);
            Ok(())
        })))
        .run()
        .unwrap();
}

#[test]
fn test_success_only_has_no_failure_text() {
    Scenario::new("success_only")
        .with_file(
            "pods/a_test.go",
            "// +docgenerator:pod:scenario=ok,successStates={Pending,Running},failureReason=\"unused\"\n",
        )
        .generates()
        .assert_lacks("Fails to transition")
        .assert_lacks("unused")
        .assert(Assertion::FailureSectionCount(0))
        .run()
        .unwrap();
}
