//! Unit tests for the entity document parser.

use super::{EntityDocumentError, parse_entity_documents, strip_dump_framing};
use geo::Coord;
use rstest::rstest;
use std::io::Cursor;
use wikilink_core::WikidataId;

fn qid(raw: &str) -> WikidataId {
    WikidataId::parse(raw).expect("valid identifier")
}

fn entity_claim(target: &str, rank: &str) -> String {
    format!(
        r#"{{"mainsnak":{{"snaktype":"value","datavalue":{{"type":"wikibase-entityid","value":{{"entity-type":"item","numeric-id":1,"id":"{target}"}}}}}},"rank":"{rank}"}}"#
    )
}

fn coordinate_claim(lat: f64, lon: f64, globe: &str, rank: &str) -> String {
    format!(
        r#"{{"mainsnak":{{"snaktype":"value","datavalue":{{"type":"globecoordinate","value":{{"latitude":{lat},"longitude":{lon},"precision":0.0001,"globe":"{globe}"}}}}}},"rank":"{rank}"}}"#
    )
}

const EARTH: &str = "http://www.wikidata.org/entity/Q2";
const MARS: &str = "http://www.wikidata.org/entity/Q111";

#[rstest]
#[case("[", None)]
#[case("]", None)]
#[case("   ", None)]
#[case(r#"{"id":"Q1"},"#, Some(r#"{"id":"Q1"}"#))]
#[case(r#" ,{"id":"Q1"} "#, Some(r#"{"id":"Q1"}"#))]
fn strips_dump_framing(#[case] line: &str, #[case] expected: Option<&str>) {
    assert_eq!(strip_dump_framing(line), expected);
}

#[rstest]
fn extracts_type_links_from_dump_lines() {
    let dump = format!(
        "[\n{{\"id\":\"Q31487\",\"claims\":{{\"P31\":[{},{}],\"P279\":[{}]}}}},\n]\n",
        entity_claim("Q515", "normal"),
        entity_claim("Q1549591", "preferred"),
        entity_claim("Q486972", "normal"),
    );

    let entities = parse_entity_documents(Cursor::new(dump)).expect("parse dump");

    assert_eq!(entities.len(), 1);
    let city = &entities[0];
    assert_eq!(city.id, qid("Q31487"));
    let instance_of: Vec<_> = city.instance_of.iter().map(WikidataId::as_str).collect();
    assert_eq!(instance_of, vec!["Q1549591", "Q515"]);
    assert!(city.subclass_of.contains(&qid("Q486972")));
    assert_eq!(city.coordinate, None);
}

#[rstest]
fn reads_entity_data_bodies() {
    let body = format!(
        r#"{{"entities":{{"Q7368":{{"id":"Q7368","claims":{{"P31":[{}]}}}},"Q2934":{{"id":"Q2934","claims":{{}}}}}}}}"#,
        entity_claim("Q16521", "normal"),
    );

    let entities = parse_entity_documents(Cursor::new(body)).expect("parse body");

    let ids: Vec<_> = entities.iter().map(|entity| entity.id.as_str()).collect();
    assert_eq!(ids, vec!["Q2934", "Q7368"]);
}

#[rstest]
fn deprecated_claims_are_ignored() {
    let dump = format!(
        r#"{{"id":"Q1","claims":{{"P31":[{},{}]}}}}"#,
        entity_claim("Q5", "deprecated"),
        entity_claim("Q43229", "normal"),
    );

    let entities = parse_entity_documents(Cursor::new(dump)).expect("parse dump");

    assert_eq!(entities[0].instance_of.len(), 1);
    assert!(entities[0].instance_of.contains(&qid("Q43229")));
}

#[rstest]
fn unknown_value_snaks_are_ignored() {
    let dump = r#"{"id":"Q1","claims":{"P31":[{"mainsnak":{"snaktype":"somevalue"}}],"P279":[{"mainsnak":{"snaktype":"novalue"}}]}}"#;

    let entities = parse_entity_documents(Cursor::new(dump)).expect("parse dump");

    assert!(entities[0].instance_of.is_empty());
    assert!(entities[0].subclass_of.is_empty());
}

#[rstest]
fn preferred_coordinate_wins() {
    let dump = format!(
        r#"{{"id":"Q31487","claims":{{"P625":[{},{}]}}}}"#,
        coordinate_claim(10.0, 10.0, EARTH, "normal"),
        coordinate_claim(50.061_389, 19.938_333, EARTH, "preferred"),
    );

    let entities = parse_entity_documents(Cursor::new(dump)).expect("parse dump");

    assert_eq!(
        entities[0].coordinate,
        Some(Coord {
            x: 19.938_333,
            y: 50.061_389,
        })
    );
}

#[rstest]
fn extraterrestrial_coordinates_are_skipped() {
    let dump = format!(
        r#"{{"id":"Q3342","claims":{{"P625":[{}]}}}}"#,
        coordinate_claim(18.65, 226.2, MARS, "normal"),
    );

    let entities = parse_entity_documents(Cursor::new(dump)).expect("parse dump");

    assert_eq!(entities[0].coordinate, None);
}

#[rstest]
fn non_item_entities_are_skipped() {
    let dump = "{\"id\":\"P31\",\"claims\":{}}\n{\"id\":\"L7\"}\n{\"id\":\"Q5\"}\n";

    let entities = parse_entity_documents(Cursor::new(dump)).expect("parse dump");

    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].id, qid("Q5"));
}

#[rstest]
fn reports_line_of_malformed_document() {
    let dump = "{\"id\":\"Q5\"}\n{not json}\n";

    let err = parse_entity_documents(Cursor::new(dump)).expect_err("malformed line");

    match err {
        EntityDocumentError::ParseEntity { line, .. } => assert_eq!(line, 2),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[rstest]
fn reports_invalid_item_identifier() {
    let dump = "{\"id\":\"Q5x\"}\n";

    let err = parse_entity_documents(Cursor::new(dump)).expect_err("invalid identifier");

    assert!(matches!(err, EntityDocumentError::InvalidId { line: 1, .. }));
}

#[rstest]
#[case::dump_line(r#"{"id":"Q1","type":"item","claims":[]}"#)]
#[case::entity_data(r#"{"entities":{"Q1":{"id":"Q1","type":"item","claims":[]}}}"#)]
fn items_without_statements_use_an_empty_claims_array(#[case] document: &str) {
    let input = format!("{document}\n{{\"id\":\"Q5\",\"claims\":{{}}}}\n");

    let entities = parse_entity_documents(Cursor::new(input)).expect("parse documents");

    let ids: Vec<_> = entities.iter().map(|entity| entity.id.as_str()).collect();
    assert_eq!(ids, vec!["Q1", "Q5"]);
    assert!(entities[0].instance_of.is_empty());
    assert_eq!(entities[0].coordinate, None);
}

#[rstest]
fn non_empty_claims_array_is_rejected() {
    let dump = r#"{"id":"Q1","claims":[{"mainsnak":{"snaktype":"novalue"}}]}"#;

    let err = parse_entity_documents(Cursor::new(dump)).expect_err("claims array");

    assert!(matches!(err, EntityDocumentError::ParseEntity { line: 1, .. }));
}
