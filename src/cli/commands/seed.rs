use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;
use serde::Serialize;
use serde_json::json;
use validator::Validate;

use crate::api::requests::{CreateCourseRequest, CreateLessonRequest, CreateModuleRequest};
use crate::cli::{connect_store, utils, OutputFormat};
use crate::database::models::CourseFilter;
use crate::database::SharedStore;
use crate::services::{CatalogService, CurriculumService, ServiceError};
use crate::types::LessonType;

const DEFAULT_COURSES: &str = include_str!("../../../fixtures/courses.yaml");

#[derive(Subcommand)]
pub enum SeedCommands {
    #[command(about = "Insert courses from a YAML list, skipping slugs that already exist")]
    Courses {
        #[arg(long, help = "YAML file of courses (defaults to the bundled catalog)")]
        file: Option<PathBuf>,
    },

    #[command(about = "Add placeholder modules and video lessons to every course")]
    Curriculum {
        #[arg(long, default_value_t = 3)]
        modules: u32,
        #[arg(long, default_value_t = 4)]
        lessons: u32,
    },
}

#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

pub async fn handle(cmd: SeedCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect_store().await?;

    match cmd {
        SeedCommands::Courses { file } => {
            let source = match &file {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => DEFAULT_COURSES.to_string(),
            };
            let courses = parse_courses(&source)?;
            let report = seed_courses(&store, courses).await?;

            let message = format!(
                "Seeded {} course(s), skipped {} existing",
                report.created.len(),
                report.skipped.len()
            );
            utils::output_success(output_format, &message, Some(serde_json::to_value(&report)?))
        }
        SeedCommands::Curriculum { modules, lessons } => {
            let (module_count, lesson_count) = seed_curriculum(&store, modules, lessons).await?;
            let message = format!("Created {} module(s) and {} lesson(s)", module_count, lesson_count);
            utils::output_success(
                output_format,
                &message,
                Some(json!({ "modules": module_count, "lessons": lesson_count })),
            )
        }
    }
}

pub fn parse_courses(source: &str) -> anyhow::Result<Vec<CreateCourseRequest>> {
    serde_yaml::from_str(source).context("invalid course YAML")
}

/// Runs every course through the same path as the admin API, so validation and
/// slug normalization match what POST /api/admin/courses would do.
pub async fn seed_courses(store: &SharedStore, courses: Vec<CreateCourseRequest>) -> anyhow::Result<SeedReport> {
    let catalog = CatalogService::new(store.clone());
    let mut report = SeedReport::default();

    for req in courses {
        let label = req.slug.clone().unwrap_or_default();
        req.validate()
            .with_context(|| format!("invalid course '{}'", label))?;

        match catalog.create(req).await {
            Ok(course) => report.created.push(course.slug),
            Err(ServiceError::Conflict(_)) => {
                tracing::debug!("Skipping existing course '{}'", label);
                report.skipped.push(label);
            }
            Err(e) => return Err(anyhow::Error::new(e).context(format!("failed to seed course '{}'", label))),
        }
    }

    Ok(report)
}

pub async fn seed_curriculum(store: &SharedStore, modules: u32, lessons: u32) -> anyhow::Result<(u32, u32)> {
    let curriculum = CurriculumService::new(store.clone());
    let courses = store.list_courses(CourseFilter::default()).await?;
    let (mut module_count, mut lesson_count) = (0, 0);

    for course in courses {
        for m in 1..=modules {
            let module = curriculum
                .create_module(CreateModuleRequest {
                    title: Some(format!("{}: Module {}", course.title, m)),
                    course_id: Some(course.id),
                    order: Some(m as i32),
                })
                .await?;
            module_count += 1;

            for l in 1..=lessons {
                curriculum
                    .create_lesson(CreateLessonRequest {
                        title: Some(format!("Lesson {}.{}", m, l)),
                        module_id: Some(module.id),
                        lesson_type: Some(LessonType::Video),
                        video_url: Some(format!("https://videos.example.com/{}/{}/{}", course.slug, m, l)),
                        assignment_description: None,
                        order: Some(l as i32),
                    })
                    .await?;
                lesson_count += 1;
            }
        }
    }

    Ok((module_count, lesson_count))
}
