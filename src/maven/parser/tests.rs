use super::*;
use crate::model::{ArtifactId, Conflict, Scope, VersionPolicy};

fn parse(input: &str) -> Result<Vec<Conflict>, ParseError> {
    Parser::parse_convergence(input.lines(), &VersionPolicy::default())
}

const SINGLE: &str = "\
[INFO] --- maven-enforcer-plugin:3.0.0:enforce (enforce) @ CouchbaseUI ---
[WARNING]
Dependency convergence error for org.jboss.logging:jboss-logging:jar:3.3.0.Final:compile paths to dependency are:
+-com.unhuman:CouchbaseUI:jar:1.0.0-SNAPSHOT
  +-com.codingrodent:jackson-json-crypto:jar:1.0:compile
    +-org.jboss.logging:jboss-logging:jar:3.3.0.Final:compile

[WARNING] Rule 0: org.apache.maven.plugins.enforcer.DependencyConvergence failed
";

const MULTI_PATH: &str = "\
Dependency convergence error for org.slf4j:slf4j-api:jar:1.7.25:compile paths to dependency are:
+-com.example:app:jar:1.0.0
  +-ch.qos.logback:logback-classic:jar:1.2.3:compile
    +-org.slf4j:slf4j-api:jar:1.7.25:compile
and
+-com.example:app:jar:1.0.0
  +-org.apache.kafka:kafka-clients:jar:2.0.0:compile
    +-org.slf4j:slf4j-api:jar:1.7.30:runtime
and
+-com.example:app:jar:1.0.0
  +-org.slf4j:slf4j-api:jar:1.7.21:test

Dependency convergence error for com.google.guava:guava:jar:20.0:compile paths to dependency are:
+-com.example:app:jar:1.0.0
  +-com.google.guava:guava:jar:20.0:compile
and
+-com.example:app:jar:1.0.0
  +-com.example:util:jar:1.0.0:compile
    +-com.google.guava:guava:jar:28.0-jre:compile

";

#[test]
fn test_parse_single_conflict() {
    let conflicts = parse(SINGLE).unwrap();
    assert_eq!(conflicts.len(), 1);

    let conflict = &conflicts[0];
    assert_eq!(conflict.id(), &ArtifactId::new("org.jboss.logging", "jboss-logging"));
    assert_eq!(conflict.roots().len(), 1);

    let root = conflict.node(conflict.roots()[0]);
    assert_eq!(root.dependency.id, ArtifactId::new("com.unhuman", "CouchbaseUI"));
    assert_eq!(root.children().len(), 1);

    let declaring = root.children()[0];
    assert_eq!(
        conflict.node(declaring).dependency.id,
        ArtifactId::new("com.codingrodent", "jackson-json-crypto")
    );

    let leaves = conflict.leaves_under(declaring);
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].id, ArtifactId::new("org.jboss.logging", "jboss-logging"));
    assert_eq!(leaves[0].version.as_str(), "3.3.0.Final");
}

#[test]
fn test_parse_multiple_paths_and_conflicts() {
    let conflicts = parse(MULTI_PATH).unwrap();
    assert_eq!(conflicts.len(), 2);

    let slf4j = &conflicts[0];
    assert_eq!(slf4j.roots().len(), 3);
    assert_eq!(slf4j.version().as_str(), "1.7.30");
    assert_eq!(slf4j.scope(), Some(&Scope::Compile));

    let guava = &conflicts[1];
    assert_eq!(guava.id().artifact, "guava");
    assert_eq!(guava.roots().len(), 2);
    // "28.0-jre" is not semantic, "20.0" neither; 28 > 20
    assert_eq!(guava.version().as_str(), "28.0-jre");
}

#[test]
fn test_direct_declaration_is_its_own_leaf() {
    let conflicts = parse(MULTI_PATH).unwrap();
    let slf4j = &conflicts[0];
    let third_root = slf4j.node(slf4j.roots()[2]);
    let declaring = third_root.children()[0];

    assert!(slf4j.node(declaring).is_leaf());
    assert_eq!(slf4j.leaves_under(declaring)[0].version.as_str(), "1.7.21");
}

#[test]
fn test_parse_bracketed_comma_format() {
    let input = "\
Dependency convergence error for a:b:jar:1.0.0 paths to dependency are:
+-x:root:jar:1.0.0
  +-x:one:jar:1.0.0:compile
    +-a:b:jar:1.0.0:compile
,
+-x:root:jar:1.0.0
  +-x:two:jar:1.0.0:compile
    +-a:b:jar:1.1.0:compile
]
";
    let conflicts = parse(input).unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].roots().len(), 2);
    assert_eq!(conflicts[0].version().as_str(), "1.1.0");
}

#[test]
fn test_parse_log_level_prefixed_lines() {
    let input = "\
[ERROR] Dependency convergence error for a:b:jar:1.0.0 paths to dependency are:
[ERROR] +-x:root:jar:1.0.0
[ERROR]   +-x:lib:jar:1.0.0:compile
[ERROR]     +-a:b:jar:1.0.0:compile
[ERROR]
";
    let conflicts = parse(input).unwrap();
    assert_eq!(conflicts.len(), 1);
    let root = conflicts[0].node(conflicts[0].roots()[0]);
    assert_eq!(root.children().len(), 1);
}

#[test]
fn test_parse_uniformly_indented_block() {
    let input = "  Dependency convergence error for a:b:jar:1.0.0 paths to dependency are:
  +-x:root:jar:1.0.0
    +-x:lib:jar:1.0.0:compile
      +-a:b:jar:1.0.0:compile

";
    let conflicts = parse(input).unwrap();
    let conflict = &conflicts[0];
    let declaring = conflict.node(conflict.roots()[0]).children()[0];
    assert_eq!(conflict.leaves_under(declaring).len(), 1);
}

#[test]
fn test_siblings_after_deeper_entry() {
    let input = "\
Dependency convergence error for a:b:jar:1.0.0 paths to dependency are:
+-x:root:jar:1.0.0
  +-x:lib:jar:1.0.0:compile
    +-x:mid:jar:1.0.0:compile
      +-a:b:jar:1.0.0:compile
    +-a:b:jar:1.2.0:compile

";
    let conflicts = parse(input).unwrap();
    let conflict = &conflicts[0];
    let declaring = conflict.node(conflict.roots()[0]).children()[0];
    assert_eq!(conflict.node(declaring).children().len(), 2);
    assert_eq!(conflict.leaves_under(declaring).len(), 2);
    assert_eq!(conflict.version().as_str(), "1.2.0");
}

#[test]
fn test_empty_input_has_no_conflicts() {
    assert!(parse("").unwrap().is_empty());
    assert!(parse("[INFO] BUILD SUCCESS\n").unwrap().is_empty());
}

#[test]
fn test_missing_path_entry_reports_line() {
    let input = "\
Dependency convergence error for a:b:jar:1.0.0 paths to dependency are:

";
    let err = parse(input).unwrap_err();
    assert_eq!(err.line, 2);
    assert!(matches!(err.kind, ParseErrorKind::ExpectedPathEntry(_)));
}

#[test]
fn test_bad_coordinates_report_line() {
    let input = "\
Dependency convergence error for a:b:jar:1.0.0 paths to dependency are:
+-x:root:jar:1.0.0
  +-broken

";
    let err = parse(input).unwrap_err();
    assert_eq!(err.line, 3);
    assert!(matches!(err.kind, ParseErrorKind::Coordinates(_)));
    assert!(err.to_string().starts_with("Error line 3:"));
}

#[test]
fn test_inconsistent_indentation_fails() {
    let input = "\
Dependency convergence error for a:b:jar:1.0.0 paths to dependency are:
+-x:root:jar:1.0.0
  +-x:lib:jar:1.0.0:compile
     +-a:b:jar:1.0.0:compile

";
    let err = parse(input).unwrap_err();
    assert_eq!(err.line, 4);
    assert_eq!(err.kind, ParseErrorKind::Indentation { width: 5, step: 2 });
}

#[test]
fn test_skipped_level_fails() {
    let input = "\
Dependency convergence error for a:b:jar:1.0.0 paths to dependency are:
+-x:root:jar:1.0.0
  +-x:lib:jar:1.0.0:compile
      +-a:b:jar:1.0.0:compile

";
    let err = parse(input).unwrap_err();
    assert_eq!(err.line, 4);
    assert_eq!(err.kind, ParseErrorKind::Orphan { depth: 3, deepest: 1 });
}

#[test]
fn test_unindented_child_fails() {
    let input = "\
Dependency convergence error for a:b:jar:1.0.0 paths to dependency are:
+-x:root:jar:1.0.0
+-a:b:jar:1.0.0:compile

";
    let err = parse(input).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingIndent);
}

#[test]
fn test_truncated_input_is_incomplete() {
    let input = "\
Dependency convergence error for a:b:jar:1.0.0 paths to dependency are:
+-x:root:jar:1.0.0
  +-a:b:jar:1.0.0:compile";
    let err = parse(input).unwrap_err();
    assert_eq!(err.line, 3);
    assert_eq!(err.kind, ParseErrorKind::Incomplete);
}

#[test]
fn test_header_detection() {
    assert!(Parser::is_convergence_header(
        "Dependency convergence error for a:b:jar:1.0 paths to dependency are:"
    ));
    assert!(Parser::is_convergence_header(
        "[WARNING] Dependency convergence error for a:b:1.0 paths to dependency are:  "
    ));
    assert!(!Parser::is_convergence_header("[INFO] BUILD SUCCESS"));
}
