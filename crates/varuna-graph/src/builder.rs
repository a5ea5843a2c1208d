//! Deterministic construction of the emergency-medicine knowledge graph.
//!
//! Node data and relationship tables are curated, static domain content.
//! Relationships are authored by `(type, name)` — name resolution happens
//! here, and a row naming an undeclared node fails the whole build. A
//! typo in a table must never silently lose a relationship.

use tracing::info;
use varuna_core::{Error, Result};

use crate::graph::KnowledgeGraph;
use crate::schema::{GraphEdge, GraphNode, NodeType, RelationType};

use NodeType::*;
use RelationType::*;

/// A relationship-table row, authored by node type and name.
struct RelationRow {
    source: (NodeType, &'static str),
    relation: RelationType,
    target: (NodeType, &'static str),
    weight: f64,
    bidirectional: bool,
}

fn rel(
    source: (NodeType, &'static str),
    relation: RelationType,
    target: (NodeType, &'static str),
    weight: f64,
) -> RelationRow {
    RelationRow {
        source,
        relation,
        target,
        weight,
        bidirectional: false,
    }
}

fn rel_bi(
    source: (NodeType, &'static str),
    relation: RelationType,
    target: (NodeType, &'static str),
    weight: f64,
) -> RelationRow {
    RelationRow {
        bidirectional: true,
        ..rel(source, relation, target, weight)
    }
}

/// Build the full curated graph. Deterministic: same data, same ids,
/// same edges on every call.
pub fn build_knowledge_graph() -> Result<KnowledgeGraph> {
    let mut graph = KnowledgeGraph::new();

    for node in domain_nodes() {
        graph.add_node(node)?;
    }
    wire(&mut graph, &relationship_rows())?;

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "knowledge graph built"
    );
    Ok(graph)
}

/// Resolve each row's names to ids and insert the edge. Unresolvable
/// names are a fatal construction error.
fn wire(graph: &mut KnowledgeGraph, rows: &[RelationRow]) -> Result<()> {
    for row in rows {
        let source_id = resolve(graph, row.source)?;
        let target_id = resolve(graph, row.target)?;
        graph.add_edge(GraphEdge {
            source_id,
            target_id,
            relation: row.relation,
            weight: row.weight,
            bidirectional: row.bidirectional,
        })?;
    }
    Ok(())
}

fn resolve(graph: &KnowledgeGraph, (node_type, name): (NodeType, &str)) -> Result<String> {
    graph
        .id_by_name(node_type, name)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Graph(format!(
                "relationship table references undeclared node {node_type} \"{name}\""
            ))
        })
}

fn domain_nodes() -> Vec<GraphNode> {
    let mut nodes = Vec::new();
    nodes.extend(emergency_types());
    nodes.extend(protocols());
    nodes.extend(departments());
    nodes.extend(staff_roles());
    nodes.extend(supplies());
    nodes.extend(equipment());
    nodes.extend(medications());
    nodes.extend(conditions());
    nodes.extend(symptoms());
    nodes.extend(procedures());
    nodes.extend(resources());
    nodes
}

fn emergency_types() -> Vec<GraphNode> {
    vec![
        GraphNode::new(EmergencyType, "Mass Vehicle Accident", 0.95)
            .keywords(&["crash", "collision", "mva", "pileup", "bus", "car", "vehicle", "wreck", "road accident"])
            .property("severity", "critical")
            .property("expected_casualties", "10-50"),
        GraphNode::new(EmergencyType, "Building Fire", 0.9)
            .keywords(&["fire", "blaze", "smoke", "burning", "structure fire"])
            .property("severity", "high"),
        GraphNode::new(EmergencyType, "Chemical Spill", 0.85)
            .keywords(&["chemical", "hazmat", "spill", "toxic", "contamination"])
            .property("severity", "high"),
        GraphNode::new(EmergencyType, "Building Collapse", 0.9)
            .keywords(&["collapse", "rubble", "crush", "earthquake", "structural failure"])
            .property("severity", "critical"),
        GraphNode::new(EmergencyType, "Active Shooter", 0.9)
            .keywords(&["shooting", "gunshot", "gsw", "shooter"])
            .property("severity", "critical"),
        GraphNode::new(EmergencyType, "Mass Casualty Incident", 0.95)
            .keywords(&["mci", "mass casualty", "casualties", "multiple victims", "surge"])
            .property("severity", "critical"),
    ]
}

fn protocols() -> Vec<GraphNode> {
    vec![
        GraphNode::new(Protocol, "Trauma Activation", 0.95)
            .keywords(&["trauma", "level one", "trauma team", "activation"])
            .property("activation_criteria", "penetrating injury, GCS < 9, hypotension"),
        GraphNode::new(Protocol, "Mass Casualty Protocol", 0.9)
            .keywords(&["mci protocol", "triage", "surge capacity", "disaster response"]),
        GraphNode::new(Protocol, "Burn Protocol", 0.85)
            .keywords(&["burn care", "burn management", "parkland formula"]),
        GraphNode::new(Protocol, "Hazmat Decontamination", 0.8)
            .keywords(&["decon", "decontamination", "hazmat response"]),
        GraphNode::new(Protocol, "Code Blue", 0.9)
            .keywords(&["resuscitation", "cpr", "arrest response"]),
        GraphNode::new(Protocol, "Massive Transfusion Protocol", 0.9)
            .keywords(&["mtp", "transfusion", "blood products"])
            .property("ratio", "1:1:1 pRBC:FFP:platelets"),
    ]
}

fn departments() -> Vec<GraphNode> {
    vec![
        GraphNode::new(Department, "Emergency Department", 0.85)
            .keywords(&["er", "ed", "emergency room"])
            .property("beds", 40),
        GraphNode::new(Department, "Trauma Bay", 0.85)
            .keywords(&["resus bay", "resuscitation bay"])
            .property("beds", 6),
        GraphNode::new(Department, "Intensive Care Unit", 0.8)
            .keywords(&["icu", "critical care"])
            .property("beds", 20),
        GraphNode::new(Department, "Burn Unit", 0.75)
            .keywords(&["burn ward", "burn center"])
            .property("beds", 12),
        GraphNode::new(Department, "Blood Bank", 0.8)
            .keywords(&["transfusion service"]),
        GraphNode::new(Department, "Pharmacy", 0.7)
            .keywords(&["dispensary"]),
        GraphNode::new(Department, "Operating Room", 0.8)
            .keywords(&["or", "surgery", "theatre"])
            .property("rooms", 8),
        GraphNode::new(Department, "Radiology", 0.7)
            .keywords(&["imaging", "x-ray", "scan"]),
    ]
}

fn staff_roles() -> Vec<GraphNode> {
    vec![
        GraphNode::new(Staff, "Trauma Surgeon", 0.9)
            .keywords(&["surgeon", "trauma team leader"])
            .property("on_call", true),
        GraphNode::new(Staff, "ER Physician", 0.85)
            .keywords(&["emergency physician", "er doctor", "attending"]),
        GraphNode::new(Staff, "Triage Nurse", 0.8)
            .keywords(&["triage", "nurse"]),
        GraphNode::new(Staff, "Charge Nurse", 0.75)
            .keywords(&["nursing supervisor"]),
        GraphNode::new(Staff, "Anesthesiologist", 0.8)
            .keywords(&["anesthesia", "airway specialist"]),
        GraphNode::new(Staff, "Burn Specialist", 0.8)
            .keywords(&["burn doctor", "plastic surgeon"]),
        GraphNode::new(Staff, "Respiratory Therapist", 0.75)
            .keywords(&["rt", "breathing specialist"]),
    ]
}

fn supplies() -> Vec<GraphNode> {
    vec![
        GraphNode::new(Supply, "O-Negative Blood", 1.0)
            .keywords(&["o-negative", "o neg", "universal donor", "blood"])
            .property("blood_type", "O-")
            .property("units_available", 24)
            .exact(),
        GraphNode::new(Supply, "O-Positive Blood", 0.9)
            .keywords(&["o-positive", "o pos", "blood"])
            .property("blood_type", "O+")
            .property("units_available", 56)
            .exact(),
        GraphNode::new(Supply, "Burn Kit", 0.9)
            .keywords(&["burn dressing", "burn supplies"])
            .property("quantity", 15)
            .exact(),
        GraphNode::new(Supply, "First Aid Kit", 0.5)
            .keywords(&["bandages", "basic supplies"])
            .property("quantity", 120),
        GraphNode::new(Supply, "Chest Tube Kit", 0.85)
            .keywords(&["thoracostomy kit", "chest drain"])
            .property("quantity", 20)
            .exact(),
        GraphNode::new(Supply, "Intubation Kit", 0.85)
            .keywords(&["airway kit", "laryngoscope"])
            .property("quantity", 18)
            .exact(),
        GraphNode::new(Supply, "IV Saline", 0.7)
            .keywords(&["normal saline", "iv fluids", "crystalloid"])
            .property("quantity", 300),
        GraphNode::new(Supply, "Tourniquet", 0.8)
            .keywords(&["bleeding control", "hemorrhage control"])
            .property("quantity", 40),
        GraphNode::new(Supply, "Oxygen Cylinder", 0.75)
            .keywords(&["oxygen", "o2", "portable oxygen"])
            .property("quantity", 30),
    ]
}

fn equipment() -> Vec<GraphNode> {
    vec![
        GraphNode::new(Equipment, "Ventilator", 0.85)
            .keywords(&["vent", "mechanical ventilation", "breathing machine"])
            .property("available", 8),
        GraphNode::new(Equipment, "Defibrillator", 0.85)
            .keywords(&["aed", "defib", "shock"])
            .property("available", 12),
        GraphNode::new(Equipment, "CT Scanner", 0.75)
            .keywords(&["ct", "cat scan"])
            .property("available", 2),
        GraphNode::new(Equipment, "Portable X-Ray", 0.7)
            .keywords(&["xray", "radiograph"])
            .property("available", 3),
        GraphNode::new(Equipment, "Infusion Pump", 0.7)
            .keywords(&["iv pump"])
            .property("available", 25),
    ]
}

fn medications() -> Vec<GraphNode> {
    vec![
        GraphNode::new(Medication, "Epinephrine", 0.95)
            .keywords(&["epi", "adrenaline"])
            .property("dosage", "1mg IV every 3-5 min")
            .exact(),
        GraphNode::new(Medication, "Morphine", 0.85)
            .keywords(&["opioid", "analgesic", "pain relief"])
            .property("dosage", "2-4mg IV")
            .exact(),
        GraphNode::new(Medication, "Fentanyl", 0.85)
            .keywords(&["opioid", "analgesic"])
            .property("dosage", "25-50mcg IV")
            .exact(),
        GraphNode::new(Medication, "Tranexamic Acid", 0.9)
            .keywords(&["txa", "antifibrinolytic"])
            .property("dosage", "1g IV over 10 min")
            .exact(),
        GraphNode::new(Medication, "Naloxone", 0.85)
            .keywords(&["narcan", "opioid reversal"])
            .property("dosage", "0.4-2mg IV/IN")
            .exact(),
        GraphNode::new(Medication, "Albuterol", 0.75)
            .keywords(&["bronchodilator", "nebulizer"])
            .property("dosage", "2.5mg nebulized")
            .exact(),
        GraphNode::new(Medication, "Silver Sulfadiazine", 0.75)
            .keywords(&["ssd", "burn cream"])
            .property("form", "topical 1% cream")
            .exact(),
    ]
}

fn conditions() -> Vec<GraphNode> {
    vec![
        GraphNode::new(Condition, "Hemorrhagic Shock", 0.9)
            .keywords(&["bleeding", "blood loss", "shock", "hemorrhage"]),
        GraphNode::new(Condition, "Blunt Trauma", 0.85)
            .keywords(&["blunt force", "internal injury"]),
        GraphNode::new(Condition, "Smoke Inhalation", 0.8)
            .keywords(&["inhalation injury", "airway burn"]),
        GraphNode::new(Condition, "Thermal Burn", 0.85)
            .keywords(&["burn", "burns", "scald"]),
        GraphNode::new(Condition, "Crush Syndrome", 0.8)
            .keywords(&["crush injury", "compartment syndrome"]),
        GraphNode::new(Condition, "Cardiac Arrest", 0.95)
            .keywords(&["arrest", "no pulse", "asystole"]),
        GraphNode::new(Condition, "Respiratory Failure", 0.85)
            .keywords(&["breathing failure", "hypoxic failure"]),
        GraphNode::new(Condition, "Chemical Exposure", 0.8)
            .keywords(&["toxic exposure", "poisoning"]),
        GraphNode::new(Condition, "Opioid Overdose", 0.8)
            .keywords(&["overdose", "od"]),
    ]
}

fn symptoms() -> Vec<GraphNode> {
    vec![
        GraphNode::new(Symptom, "Hypotension", 0.6).keywords(&["low blood pressure"]),
        GraphNode::new(Symptom, "Hypoxia", 0.6).keywords(&["low oxygen", "desaturation"]),
        GraphNode::new(Symptom, "Severe Bleeding", 0.65).keywords(&["hemorrhage", "bleeding out"]),
    ]
}

fn procedures() -> Vec<GraphNode> {
    vec![
        GraphNode::new(Procedure, "Intubation", 0.85)
            .keywords(&["airway management", "rsi"]),
        GraphNode::new(Procedure, "Chest Tube Insertion", 0.8)
            .keywords(&["thoracostomy"]),
        GraphNode::new(Procedure, "Blood Transfusion", 0.85)
            .keywords(&["transfusion"]),
        GraphNode::new(Procedure, "Decontamination", 0.7)
            .keywords(&["decon shower", "washdown"]),
    ]
}

fn resources() -> Vec<GraphNode> {
    vec![
        GraphNode::new(Resource, "ICU Bed", 0.8)
            .keywords(&["critical care bed"])
            .property("available", 5),
        GraphNode::new(Resource, "ER Bed", 0.75)
            .keywords(&["emergency bed"])
            .property("available", 14),
        GraphNode::new(Resource, "Ambulance", 0.7)
            .keywords(&["ems", "transport"])
            .property("available", 6),
    ]
}

fn relationship_rows() -> Vec<RelationRow> {
    vec![
        // Emergencies activate protocols
        rel((EmergencyType, "Mass Vehicle Accident"), Activates, (Protocol, "Trauma Activation"), 0.95),
        rel((EmergencyType, "Mass Vehicle Accident"), Activates, (Protocol, "Mass Casualty Protocol"), 0.85),
        rel((EmergencyType, "Building Fire"), Activates, (Protocol, "Burn Protocol"), 0.95),
        rel((EmergencyType, "Building Fire"), Activates, (Protocol, "Mass Casualty Protocol"), 0.7),
        rel((EmergencyType, "Chemical Spill"), Activates, (Protocol, "Hazmat Decontamination"), 0.95),
        rel((EmergencyType, "Building Collapse"), Activates, (Protocol, "Trauma Activation"), 0.9),
        rel((EmergencyType, "Building Collapse"), Activates, (Protocol, "Mass Casualty Protocol"), 0.8),
        rel((EmergencyType, "Active Shooter"), Activates, (Protocol, "Trauma Activation"), 0.9),
        rel((EmergencyType, "Active Shooter"), Activates, (Protocol, "Mass Casualty Protocol"), 0.85),
        rel((EmergencyType, "Mass Casualty Incident"), Activates, (Protocol, "Mass Casualty Protocol"), 0.95),
        rel((Condition, "Cardiac Arrest"), Activates, (Protocol, "Code Blue"), 0.95),
        // Emergencies and symptoms indicate conditions
        rel((EmergencyType, "Mass Vehicle Accident"), Indicates, (Condition, "Blunt Trauma"), 0.9),
        rel((EmergencyType, "Mass Vehicle Accident"), Indicates, (Condition, "Hemorrhagic Shock"), 0.8),
        rel((EmergencyType, "Building Fire"), Indicates, (Condition, "Thermal Burn"), 0.9),
        rel((EmergencyType, "Building Fire"), Indicates, (Condition, "Smoke Inhalation"), 0.85),
        rel((EmergencyType, "Chemical Spill"), Indicates, (Condition, "Chemical Exposure"), 0.9),
        rel((EmergencyType, "Building Collapse"), Indicates, (Condition, "Crush Syndrome"), 0.9),
        rel((Symptom, "Hypotension"), Indicates, (Condition, "Hemorrhagic Shock"), 0.8),
        rel((Symptom, "Hypoxia"), Indicates, (Condition, "Respiratory Failure"), 0.85),
        rel((Symptom, "Severe Bleeding"), Indicates, (Condition, "Hemorrhagic Shock"), 0.9),
        // Protocol requirements
        rel((Protocol, "Trauma Activation"), Requires, (Supply, "O-Negative Blood"), 0.9),
        rel((Protocol, "Trauma Activation"), Requires, (Supply, "Chest Tube Kit"), 0.8),
        rel((Protocol, "Trauma Activation"), Requires, (Staff, "Trauma Surgeon"), 0.95),
        rel((Protocol, "Trauma Activation"), Requires, (Department, "Trauma Bay"), 0.9),
        rel((Protocol, "Mass Casualty Protocol"), Requires, (Staff, "Triage Nurse"), 0.9),
        rel((Protocol, "Mass Casualty Protocol"), Requires, (Resource, "ER Bed"), 0.8),
        rel((Protocol, "Mass Casualty Protocol"), Requires, (Resource, "Ambulance"), 0.7),
        rel((Protocol, "Burn Protocol"), Requires, (Supply, "Burn Kit"), 0.95),
        rel((Protocol, "Burn Protocol"), Requires, (Medication, "Silver Sulfadiazine"), 0.85),
        rel((Protocol, "Burn Protocol"), Requires, (Supply, "IV Saline"), 0.8),
        rel((Protocol, "Burn Protocol"), Requires, (Staff, "Burn Specialist"), 0.9),
        rel((Protocol, "Hazmat Decontamination"), Requires, (Supply, "Oxygen Cylinder"), 0.6),
        rel((Protocol, "Code Blue"), Requires, (Equipment, "Defibrillator"), 0.95),
        rel((Protocol, "Code Blue"), Requires, (Medication, "Epinephrine"), 0.9),
        rel((Protocol, "Massive Transfusion Protocol"), Requires, (Supply, "O-Negative Blood"), 0.95),
        rel((Protocol, "Massive Transfusion Protocol"), Requires, (Medication, "Tranexamic Acid"), 0.8),
        rel((Protocol, "Massive Transfusion Protocol"), Requires, (Equipment, "Infusion Pump"), 0.7),
        // Medications treat conditions
        rel((Medication, "Epinephrine"), Treats, (Condition, "Cardiac Arrest"), 0.95),
        rel((Medication, "Morphine"), Treats, (Condition, "Blunt Trauma"), 0.7),
        rel((Medication, "Fentanyl"), Treats, (Condition, "Blunt Trauma"), 0.75),
        rel((Medication, "Tranexamic Acid"), Treats, (Condition, "Hemorrhagic Shock"), 0.85),
        rel((Medication, "Naloxone"), Treats, (Condition, "Opioid Overdose"), 0.95),
        rel((Medication, "Albuterol"), Treats, (Condition, "Smoke Inhalation"), 0.8),
        rel((Medication, "Silver Sulfadiazine"), Treats, (Condition, "Thermal Burn"), 0.85),
        // Contraindications
        rel((Medication, "Morphine"), Contraindicated, (Condition, "Respiratory Failure"), 0.9),
        rel((Medication, "Fentanyl"), Contraindicated, (Condition, "Opioid Overdose"), 0.95),
        // Alternatives
        rel((Supply, "O-Positive Blood"), AlternativeTo, (Supply, "O-Negative Blood"), 0.6),
        rel_bi((Medication, "Fentanyl"), AlternativeTo, (Medication, "Morphine"), 0.8),
        // Escalation paths
        rel((Protocol, "Trauma Activation"), EscalatesTo, (Protocol, "Massive Transfusion Protocol"), 0.8),
        rel((Protocol, "Burn Protocol"), EscalatesTo, (Protocol, "Trauma Activation"), 0.6),
        // Staff specializations
        rel((Staff, "Trauma Surgeon"), SpecializesIn, (Condition, "Blunt Trauma"), 0.9),
        rel((Staff, "Trauma Surgeon"), SpecializesIn, (Condition, "Hemorrhagic Shock"), 0.85),
        rel((Staff, "Burn Specialist"), SpecializesIn, (Condition, "Thermal Burn"), 0.9),
        rel((Staff, "Respiratory Therapist"), SpecializesIn, (Condition, "Respiratory Failure"), 0.85),
        rel((Staff, "Anesthesiologist"), SpecializesIn, (Procedure, "Intubation"), 0.9),
        rel((Staff, "ER Physician"), SpecializesIn, (Condition, "Cardiac Arrest"), 0.8),
        // Locations — staff ↔ department edges are bidirectional
        rel_bi((Staff, "Trauma Surgeon"), LocatedIn, (Department, "Trauma Bay"), 0.8),
        rel_bi((Staff, "ER Physician"), LocatedIn, (Department, "Emergency Department"), 0.8),
        rel_bi((Staff, "Triage Nurse"), LocatedIn, (Department, "Emergency Department"), 0.8),
        rel_bi((Staff, "Charge Nurse"), LocatedIn, (Department, "Emergency Department"), 0.7),
        rel_bi((Staff, "Burn Specialist"), LocatedIn, (Department, "Burn Unit"), 0.8),
        rel((Equipment, "Ventilator"), LocatedIn, (Department, "Intensive Care Unit"), 0.7),
        rel((Equipment, "CT Scanner"), LocatedIn, (Department, "Radiology"), 0.9),
        rel((Equipment, "Portable X-Ray"), LocatedIn, (Department, "Emergency Department"), 0.7),
        rel((Equipment, "Defibrillator"), LocatedIn, (Department, "Emergency Department"), 0.8),
        // Containment
        rel((Department, "Trauma Bay"), PartOf, (Department, "Emergency Department"), 0.9),
        rel((Resource, "ICU Bed"), PartOf, (Department, "Intensive Care Unit"), 0.8),
        rel((Resource, "ER Bed"), PartOf, (Department, "Emergency Department"), 0.8),
        // Procedures use supplies and equipment
        rel((Procedure, "Intubation"), Uses, (Supply, "Intubation Kit"), 0.95),
        rel((Procedure, "Intubation"), Uses, (Equipment, "Ventilator"), 0.8),
        rel((Procedure, "Chest Tube Insertion"), Uses, (Supply, "Chest Tube Kit"), 0.95),
        rel((Procedure, "Blood Transfusion"), Uses, (Supply, "O-Negative Blood"), 0.85),
        rel((Procedure, "Blood Transfusion"), Uses, (Equipment, "Infusion Pump"), 0.7),
        rel((Protocol, "Hazmat Decontamination"), Uses, (Procedure, "Decontamination"), 0.9),
        // Alert fan-out
        rel((Protocol, "Trauma Activation"), Alerts, (Staff, "Trauma Surgeon"), 0.95),
        rel((Protocol, "Trauma Activation"), Alerts, (Department, "Blood Bank"), 0.8),
        rel((Protocol, "Mass Casualty Protocol"), Alerts, (Staff, "Charge Nurse"), 0.9),
        rel((Protocol, "Mass Casualty Protocol"), Alerts, (Department, "Emergency Department"), 0.85),
        rel((Protocol, "Code Blue"), Alerts, (Staff, "ER Physician"), 0.9),
        rel((Protocol, "Burn Protocol"), Alerts, (Department, "Burn Unit"), 0.85),
        rel((Protocol, "Hazmat Decontamination"), Alerts, (Department, "Emergency Department"), 0.7),
        // Supply chains
        rel((Department, "Blood Bank"), Supplies, (Supply, "O-Negative Blood"), 0.95),
        rel((Department, "Blood Bank"), Supplies, (Supply, "O-Positive Blood"), 0.95),
        rel((Department, "Pharmacy"), Supplies, (Medication, "Morphine"), 0.9),
        rel((Department, "Pharmacy"), Supplies, (Medication, "Epinephrine"), 0.9),
        rel((Department, "Pharmacy"), Supplies, (Medication, "Tranexamic Acid"), 0.85),
        rel((Department, "Pharmacy"), Supplies, (Medication, "Naloxone"), 0.85),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_build_succeeds() {
        let graph = build_knowledge_graph().unwrap();
        assert!(graph.node_count() > 50);
        assert!(graph.edge_count() > 70);
    }

    #[test]
    fn test_build_is_idempotent() {
        let a = build_knowledge_graph().unwrap();
        let b = build_knowledge_graph().unwrap();
        let ids_a: BTreeSet<String> = a.nodes().map(|n| n.id.clone()).collect();
        let ids_b: BTreeSet<String> = b.nodes().map(|n| n.id.clone()).collect();
        assert_eq!(ids_a, ids_b);
        assert_eq!(a.edge_count(), b.edge_count());
    }

    #[test]
    fn test_every_edge_endpoint_exists() {
        let graph = build_knowledge_graph().unwrap();
        for edge in graph.edges() {
            assert!(graph.get(&edge.source_id).is_some());
            assert!(graph.get(&edge.target_id).is_some());
        }
    }

    #[test]
    fn test_bidirectional_edges_are_symmetric() {
        let graph = build_knowledge_graph().unwrap();
        for edge in graph.edges() {
            assert!(graph.neighbors(&edge.source_id).contains(&edge.target_id.as_str()));
            if edge.bidirectional {
                assert!(graph.neighbors(&edge.target_id).contains(&edge.source_id.as_str()));
            }
        }
    }

    #[test]
    fn test_undeclared_name_fails_the_build() {
        let mut graph = KnowledgeGraph::new();
        for node in domain_nodes() {
            graph.add_node(node).unwrap();
        }
        let rows = vec![rel(
            (Protocol, "Trauma Activation"),
            Requires,
            (Supply, "Hemostatic Gauze"), // not declared in the node data
            0.9,
        )];
        let err = wire(&mut graph, &rows).unwrap_err();
        assert!(err.to_string().contains("Hemostatic Gauze"));
    }

    #[test]
    fn test_exact_flags_on_unsafe_entities() {
        let graph = build_knowledge_graph().unwrap();
        for name in ["O-Negative Blood", "O-Positive Blood", "Burn Kit"] {
            let node = graph.nodes().find(|n| n.name == name).unwrap();
            assert!(node.exact_match_required, "{name} must be exact-match");
        }
        // Generic supplies stay substitutable
        let kit = graph.nodes().find(|n| n.name == "First Aid Kit").unwrap();
        assert!(!kit.exact_match_required);
    }

    #[test]
    fn test_keywords_always_include_name() {
        let graph = build_knowledge_graph().unwrap();
        for node in graph.nodes() {
            assert!(
                node.keywords.contains(&node.name.to_lowercase()),
                "{} missing its own name keyword",
                node.name
            );
        }
    }
}
