//! Discovery of exercise/solution topic pairs and layout checks
use crate::config::CourseConfig;
use crate::error::{ChainError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::todo::{check_todo_order, header_doc, scan_todos, todo_count, TodoMarker, TodoOrderViolation};

static ORDINAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)[_-]").expect("ordinal pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Exercise,
    Solution,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Exercise => write!(f, "exercise"),
            Side::Solution => write!(f, "solution"),
        }
    }
}

/// One course topic, present in the exercise tree, the solution tree, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub name: String,
    pub ordinal: Option<u32>,
    pub exercise: Option<PathBuf>,
    pub solution: Option<PathBuf>,
}

impl Topic {
    fn new(name: String) -> Self {
        let ordinal = ORDINAL_PREFIX
            .captures(&name)
            .and_then(|caps| caps[1].parse::<u32>().ok());
        Self {
            name,
            ordinal,
            exercise: None,
            solution: None,
        }
    }

    /// Name without the ordinal prefix, e.g. `hashing` for `3_hashing`.
    pub fn short_name(&self) -> &str {
        match ORDINAL_PREFIX.find(&self.name) {
            Some(m) => &self.name[m.end()..],
            None => &self.name,
        }
    }

    pub fn dir(&self, side: Side) -> Option<&Path> {
        match side {
            Side::Exercise => self.exercise.as_deref(),
            Side::Solution => self.solution.as_deref(),
        }
    }

    pub fn entry_point(&self, side: Side, entry_point: &str) -> Option<PathBuf> {
        self.dir(side).map(|dir| dir.join(entry_point))
    }

    fn matches(&self, query: &str) -> bool {
        self.name == query
            || self.short_name() == query
            || query.parse::<u32>().ok().is_some_and(|n| self.ordinal == Some(n))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutIssue {
    MissingSolution { topic: String },
    MissingExercise { topic: String },
    MissingEntryPoint { topic: String, side: Side, path: PathBuf },
    TodoOrder { topic: String, violation: TodoOrderViolation },
}

impl fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LayoutIssue::MissingSolution { topic } => {
                write!(f, "{}: exercise has no matching solution", topic)
            }
            LayoutIssue::MissingExercise { topic } => {
                write!(f, "{}: solution has no matching exercise", topic)
            }
            LayoutIssue::MissingEntryPoint { topic, side, path } => {
                write!(f, "{}: {} is missing {}", topic, side, path.display())
            }
            LayoutIssue::TodoOrder { topic, violation } => {
                write!(f, "{}: {}", topic, violation)
            }
        }
    }
}

/// Per-topic view used by `show` and `todos`.
#[derive(Debug, Clone, Serialize)]
pub struct TopicReport {
    pub topic: Topic,
    pub side: Side,
    pub entry_point: PathBuf,
    pub header: String,
    pub todos: Vec<TodoMarker>,
    pub workflow: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Course {
    pub config: CourseConfig,
    pub topics: Vec<Topic>,
}

fn topic_dirs(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ChainError::CourseError(e.to_string()))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        dirs.push((name, entry.into_path()));
    }
    Ok(dirs)
}

impl Course {
    /// Scan the exercise and solution trees and pair topics by directory name.
    pub fn discover(config: &CourseConfig) -> Result<Self> {
        let exercises_root = config.exercises_root();
        let solutions_root = config.solutions_root();

        if !exercises_root.is_dir() && !solutions_root.is_dir() {
            return Err(ChainError::CourseError(format!(
                "neither {} nor {} is a directory",
                exercises_root.display(),
                solutions_root.display()
            )));
        }

        let mut by_name: BTreeMap<String, Topic> = BTreeMap::new();
        for (name, path) in topic_dirs(&exercises_root)? {
            by_name
                .entry(name.clone())
                .or_insert_with(|| Topic::new(name))
                .exercise = Some(path);
        }
        for (name, path) in topic_dirs(&solutions_root)? {
            by_name
                .entry(name.clone())
                .or_insert_with(|| Topic::new(name))
                .solution = Some(path);
        }

        let mut topics: Vec<Topic> = by_name.into_values().collect();
        // Numbered topics first, in course order
        topics.sort_by(|a, b| match (a.ordinal, b.ordinal) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(&b.name)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        });

        tracing::debug!(topics = topics.len(), root = %config.root.display(), "discovered course");
        Ok(Course {
            config: config.clone(),
            topics,
        })
    }

    /// Look a topic up by full name, name without prefix, or ordinal.
    pub fn topic(&self, query: &str) -> Result<&Topic> {
        self.topics
            .iter()
            .find(|t| t.matches(query))
            .ok_or_else(|| ChainError::CourseError(format!("no topic matches {:?}", query)))
    }

    /// Every pairing, entry-point and TODO-ordering problem in the course.
    pub fn check(&self) -> Result<Vec<LayoutIssue>> {
        let mut issues = Vec::new();

        for topic in &self.topics {
            if topic.exercise.is_some() && topic.solution.is_none() {
                issues.push(LayoutIssue::MissingSolution {
                    topic: topic.name.clone(),
                });
            }
            if topic.solution.is_some() && topic.exercise.is_none() {
                issues.push(LayoutIssue::MissingExercise {
                    topic: topic.name.clone(),
                });
            }

            for side in [Side::Exercise, Side::Solution] {
                let Some(path) = topic.entry_point(side, &self.config.entry_point) else {
                    continue;
                };
                if !path.is_file() {
                    issues.push(LayoutIssue::MissingEntryPoint {
                        topic: topic.name.clone(),
                        side,
                        path,
                    });
                    continue;
                }
                if side == Side::Exercise {
                    let source = fs::read_to_string(&path)?;
                    if let Err(violation) = check_todo_order(&scan_todos(&source)) {
                        issues.push(LayoutIssue::TodoOrder {
                            topic: topic.name.clone(),
                            violation,
                        });
                    }
                }
            }
        }

        if issues.is_empty() {
            tracing::info!(topics = self.topics.len(), "course layout is consistent");
        } else {
            tracing::warn!(issues = issues.len(), "course layout has problems");
        }
        Ok(issues)
    }

    /// Header, TODO markers and workflow for one side of a topic.
    pub fn report(&self, query: &str, side: Side) -> Result<TopicReport> {
        let topic = self.topic(query)?;
        let entry_point = topic
            .entry_point(side, &self.config.entry_point)
            .ok_or_else(|| {
                ChainError::CourseError(format!("{} has no {} directory", topic.name, side))
            })?;
        let source = fs::read_to_string(&entry_point).map_err(|e| {
            ChainError::CourseError(format!("cannot read {}: {}", entry_point.display(), e))
        })?;
        let todos = scan_todos(&source);

        Ok(TopicReport {
            topic: topic.clone(),
            side,
            header: header_doc(&source),
            workflow: self.workflow_steps(topic, todo_count(&todos)),
            entry_point,
            todos,
        })
    }

    /// The documented exercise workflow, spelled out with this topic's paths.
    pub fn workflow_steps(&self, topic: &Topic, todo_total: u32) -> Vec<String> {
        let entry = &self.config.entry_point;
        let mut steps = Vec::new();

        match &topic.exercise {
            Some(dir) => {
                steps.push(format!("cd {}", dir.display()));
                steps.push(format!(
                    "Read the header comment of {} for the goal and sample output",
                    entry
                ));
                if todo_total > 0 {
                    steps.push(format!(
                        "Implement TODO 1 through TODO {} in order; later steps build on earlier ones",
                        todo_total
                    ));
                } else {
                    steps.push("Implement the functions marked TODO, lowest number first".to_string());
                }
                steps.push("cargo test".to_string());
                steps.push("cargo run, then compare with the sample output".to_string());
            }
            None => steps.push(format!("{} has no exercise to work on", topic.name)),
        }

        if let Some(dir) = &topic.solution {
            steps.push(format!("Reference solution: {}", dir.join(entry).display()));
        }
        steps
    }
}
