//! Process name matching.
//!
//! Dataset names are split over four multilingual components and are often
//! filled only partially. A requirement's `process_name` is matched against
//! every component text and every `; `-joined combination of them, tolerating
//! missing components, differing order and `*` wildcards.

use regex::Regex;
use serde_json::{Map, Value};
use tidas_model::document::{all_texts, get_path, non_empty_str};
use tidas_model::{ProcessRequirement, RequirementBundle};

const NAME_PATH: &[&str] = &["dataSetInformation", "name"];
const UUID_PATH: &[&str] = &["dataSetInformation", "common:UUID"];
const NAME_COMPONENTS: &[&str] = &[
    "baseName",
    "treatmentStandardsRoutes",
    "mixAndLocationTypes",
    "functionalUnitFlowProperties",
];

/// Lower-cases, collapses whitespace and rejoins `;` segments with `"; "`.
pub fn normalize_name(value: &str) -> String {
    value
        .split(';')
        .map(|segment| {
            segment
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase()
        })
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

fn process_information<'r>(root: &'r Map<String, Value>, path: &[&str]) -> Option<&'r Value> {
    get_path(root.get("processInformation")?, path)
}

/// Candidate names of a process dataset root.
///
/// Individual component texts come first, followed by the product of all
/// non-empty components joined with `"; "`. Duplicates are removed.
pub fn name_candidates(root: &Map<String, Value>) -> Vec<String> {
    let Some(name) = process_information(root, NAME_PATH).filter(|name| name.is_object()) else {
        return Vec::new();
    };
    let components: Vec<Vec<String>> = NAME_COMPONENTS
        .iter()
        .map(|key| name.get(*key).map(all_texts).unwrap_or_default())
        .filter(|texts| !texts.is_empty())
        .collect();

    let mut candidates: Vec<String> = components.iter().flatten().cloned().collect();
    if !components.is_empty() {
        let combinations = components.iter().fold(vec![Vec::<&str>::new()], |prefixes, options| {
            prefixes
                .iter()
                .flat_map(|prefix| {
                    options.iter().map(move |option| {
                        let mut next = prefix.clone();
                        next.push(option.as_str());
                        next
                    })
                })
                .collect()
        });
        candidates.extend(combinations.into_iter().map(|parts| parts.join("; ")));
    }

    let mut unique = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let candidate = candidate.trim().to_string();
        if !candidate.is_empty() && !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// A compiled requirement process name.
///
/// `*` is only a wildcard for the whole name; the segment rules compare
/// segments as literal text.
#[derive(Debug, Clone)]
pub struct NamePattern {
    normalized: String,
    segments: Vec<String>,
    wildcard: Option<Regex>,
}

fn wildcard_regex(pattern: &str) -> Option<Regex> {
    let body = regex::escape(pattern).replace(r"\*", ".*");
    Regex::new(&format!("^{body}$")).ok()
}

fn name_segments(name: &str) -> impl Iterator<Item = &str> {
    name.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

impl NamePattern {
    pub fn new(process_name: &str) -> Self {
        let normalized = normalize_name(process_name);
        let segments = name_segments(&normalized).map(str::to_string).collect();
        let wildcard = normalized
            .contains('*')
            .then(|| wildcard_regex(&normalized))
            .flatten();
        Self {
            normalized,
            segments,
            wildcard,
        }
    }

    /// Tests one candidate name (normalized here).
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = normalize_name(candidate);
        let provided = self.normalized.as_str();
        if provided.is_empty() || candidate.is_empty() {
            return false;
        }
        if provided == candidate {
            return true;
        }
        if self
            .wildcard
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(&candidate))
        {
            return true;
        }
        if provided.contains(candidate.as_str()) || candidate.contains(provided) {
            return true;
        }
        if !self.segments.is_empty()
            && self
                .segments
                .iter()
                .all(|segment| candidate.contains(segment.as_str()))
        {
            return true;
        }
        let mut candidate_segments = name_segments(&candidate).peekable();
        candidate_segments.peek().is_some()
            && candidate_segments.all(|segment| provided.contains(segment))
    }

    pub fn matches_any(&self, candidates: &[String]) -> bool {
        candidates.iter().any(|candidate| self.matches(candidate))
    }
}

/// Whether `process_name` refers to the same process as `candidate`.
pub fn names_match(process_name: &str, candidate: &str) -> bool {
    NamePattern::new(process_name).matches(candidate)
}

/// First requirement whose name matches the dataset, with its 1-based position.
pub fn match_process<'b>(
    root: &Map<String, Value>,
    requirements: &'b [ProcessRequirement],
) -> Option<(usize, &'b ProcessRequirement)> {
    if requirements.is_empty() {
        return None;
    }
    let candidates = name_candidates(root);
    requirements
        .iter()
        .enumerate()
        .find(|(_, requirement)| NamePattern::new(requirement.process_name.trim()).matches_any(&candidates))
        .map(|(index, requirement)| (index + 1, requirement))
}

/// The process requirement selected for a dataset.
#[derive(Debug, Clone, Copy)]
pub struct ProcessMatch<'b> {
    pub requirement: &'b ProcessRequirement,
    /// 1-based position among the declared process updates (name matches only).
    pub index: Option<usize>,
    /// Template name when selected through an identifier binding.
    pub binding: Option<&'b str>,
}

/// Dataset identifier recorded in the process information block.
pub fn dataset_uuid(root: &Map<String, Value>) -> Option<&str> {
    non_empty_str(process_information(root, UUID_PATH))
}

/// Selects the applicable process requirement: identifier bindings first, then names.
pub fn select_process<'b>(
    root: &Map<String, Value>,
    bundle: &'b RequirementBundle,
) -> Option<ProcessMatch<'b>> {
    if let Some(requirement) = dataset_uuid(root).and_then(|id| bundle.binding_for(id)) {
        return Some(ProcessMatch {
            requirement,
            index: None,
            binding: Some(
                requirement
                    .template_name
                    .as_deref()
                    .unwrap_or(requirement.process_name.as_str()),
            ),
        });
    }
    match_process(root, &bundle.process_updates).map(|(index, requirement)| ProcessMatch {
        requirement,
        index: Some(index),
        binding: None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn root(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    fn wind_turbine() -> Map<String, Value> {
        root(json!({"processInformation": {"dataSetInformation": {"name": {
            "baseName": [{"@xml:lang": "zh", "#text": "风力发电机组制造"}],
            "treatmentStandardsRoutes": {"@xml:lang": "zh", "#text": "陆上风电"},
            "mixAndLocationTypes": [{"@xml:lang": "zh", "#text": "生产组合"}],
            "functionalUnitFlowProperties": {"@xml:lang": "en", "#text": "8 MW"}
        }}}}))
    }

    #[test]
    fn normalizes_segments() {
        assert_eq!(normalize_name("  Wind   Power ;; Onshore;"), "wind power; onshore");
        assert_eq!(normalize_name(" ; "), "");
    }

    #[test]
    fn builds_component_and_combined_candidates() {
        let candidates = name_candidates(&wind_turbine());
        assert_eq!(
            candidates,
            vec![
                "风力发电机组制造",
                "陆上风电",
                "生产组合",
                "8 MW",
                "风力发电机组制造; 陆上风电; 生产组合; 8 MW",
            ]
        );
    }

    #[test]
    fn candidates_cover_every_language_combination() {
        let dataset = root(json!({"processInformation": {"dataSetInformation": {"name": {
            "baseName": [
                {"@xml:lang": "zh", "#text": "风电场运维"},
                {"@xml:lang": "en", "#text": "Wind farm operation"}
            ],
            "mixAndLocationTypes": [
                {"@xml:lang": "zh", "#text": "陆/海上风电"},
                {"@xml:lang": "en", "#text": "Onshore/offshore"}
            ]
        }}}}));
        let candidates = name_candidates(&dataset);
        assert_eq!(candidates.len(), 8);
        assert!(candidates.contains(&"Wind farm operation; 陆/海上风电".to_string()));
    }

    #[test]
    fn wildcard_requirement_matches_partial_product() {
        let requirements = vec![
            ProcessRequirement::new("光伏组件制造"),
            ProcessRequirement::new("风力发电机组制造; *; 生产组合"),
        ];
        let (index, matched) = match_process(&wind_turbine(), &requirements).unwrap();
        assert_eq!(index, 2);
        assert_eq!(matched.process_name, "风力发电机组制造; *; 生产组合");
    }

    #[test]
    fn partial_segments_match() {
        let dataset = root(json!({"processInformation": {"dataSetInformation": {"name": {
            "baseName": {"@xml:lang": "zh", "#text": "风电场运维"},
            "treatmentStandardsRoutes": {"@xml:lang": "zh", "#text": "运行维护"},
            "mixAndLocationTypes": {"@xml:lang": "zh", "#text": "陆/海上风电"}
        }}}}));
        let requirements = vec![ProcessRequirement::new("风电场运维; 陆/海上风电")];
        assert_eq!(
            match_process(&dataset, &requirements).map(|(index, _)| index),
            Some(1)
        );
    }

    #[test]
    fn comparison_rules() {
        assert!(names_match("Wind  Power", "wind power"));
        assert!(names_match("wind", "Wind power; onshore"));
        assert!(names_match("onshore; wind", "wind power; onshore"));
        assert!(names_match("wind power; onshore; 8 mw", "onshore; 8 MW"));
        assert!(names_match("wind*; onshore", "wind turbine; onshore"));
        assert!(!names_match("solar", "wind power"));
        assert!(names_match("*", "anything at all"));
        assert!(!names_match("*; solar", "wind power; 8 mw"));
        assert!(!names_match("", "wind"));
    }

    #[test]
    fn star_segments_are_literal_outside_the_full_name() {
        assert!(!names_match("光伏; *", "光伏组件"));
        assert!(!names_match("风电*; 陆上风电", "海上风电; 陆上风电"));
        assert!(!names_match("*; onshore", "wind power; onshore; 8 mw"));
        assert!(names_match("风电*; 陆上风电", "风电场建设; 陆上风电"));
        assert!(names_match("a*b; c", "a*b; c; d"));
    }

    #[test]
    fn earlier_wildcard_does_not_take_other_processes() {
        let requirements = vec![
            ProcessRequirement::new("*; 组合"),
            ProcessRequirement::new("风力发电机组制造"),
        ];
        let (index, matched) = match_process(&wind_turbine(), &requirements).unwrap();
        assert_eq!(index, 2);
        assert_eq!(matched.process_name, "风力发电机组制造");
    }

    #[test]
    fn binding_takes_precedence_over_names() {
        let mut bundle = RequirementBundle::default();
        bundle
            .process_updates
            .push(ProcessRequirement::new("风力发电机组制造"));
        let mut bound = ProcessRequirement::new("风电场建设");
        bound.template_name = Some("process_1_updates".to_string());
        bundle.uuid_bindings.insert("p-1".to_string(), bound);

        let mut dataset = wind_turbine();
        let selected = select_process(&dataset, &bundle).unwrap();
        assert_eq!(selected.index, Some(1));
        assert!(selected.binding.is_none());

        dataset["processInformation"]["dataSetInformation"]["common:UUID"] = json!("p-1");
        let selected = select_process(&dataset, &bundle).unwrap();
        assert_eq!(selected.binding, Some("process_1_updates"));
        assert_eq!(selected.index, None);
        assert_eq!(selected.requirement.process_name, "风电场建设");
    }
}
