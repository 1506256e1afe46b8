use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use readwise::config::{Config, Thresholds};
use readwise::content::{self, QuestionSet};
use readwise::engine::activity::{current_streak, goal_progress, month_calendar, shift_month};
use readwise::engine::level::{XpEvent, level_progress, level_tier, skill_breakdown, xp_for};
use readwise::engine::quiz::{AnswerMap, score};
use readwise::engine::summary::{analyze_star, similarity};
use readwise::report;
use readwise::store::json_store::JsonStore;
use readwise::store::schema::{ProfileData, QuizRecord};

#[derive(Parser)]
#[command(
    name = "readwise",
    version,
    about = "Reading progress and mastery scoring for young readers"
)]
struct Cli {
    #[arg(long, global = true, help = "Directory holding profile.json")]
    data: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to config.toml")]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_parser = parse_date,
        help = "Date to treat as today (YYYY-MM-DD)"
    )]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score answers to a question set
    Quiz {
        #[arg(short, long, default_value = "enchanted-forest")]
        set: String,

        #[arg(
            short,
            long = "answer",
            value_parser = parse_answer,
            help = "Answer as <question number>=<option id>, e.g. 1=b"
        )]
        answers: Vec<(usize, String)>,

        #[arg(long, help = "Use the questions shown on this page instead of the post-reading quiz")]
        page: Option<u32>,

        #[arg(long, help = "Save the result to the reader's quiz history")]
        record: bool,
    },
    /// Show reading level and XP progress
    Level,
    /// Show the skill breakdown
    Skills,
    /// Show the reading calendar for a month
    Calendar {
        #[arg(long, value_parser = parse_month, help = "Month as YYYY-MM")]
        month: Option<(i32, u32)>,

        #[arg(
            long,
            default_value_t = 0,
            allow_negative_numbers = true,
            help = "Months to move from the chosen month, e.g. -1 for the previous one"
        )]
        offset: i32,
    },
    /// Split a book summary into Situation, Task, Action and Result
    Star {
        text: String,

        #[arg(long, help = "Model summary to compare each part against")]
        against: Option<String>,
    },
    /// Show the achievement gallery
    Achievements,
    /// List available question sets
    Sets,
    /// Create a profile (and optionally a config file)
    Init {
        #[arg(long, help = "Start from the bundled sample reader")]
        sample: bool,

        #[arg(long, help = "Overwrite an existing profile")]
        force: bool,

        #[arg(long, help = "Also write the default config file")]
        write_config: bool,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

fn parse_month(s: &str) -> Result<(i32, u32), String> {
    let date = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .map_err(|e| format!("invalid month '{s}': {e}"))?;
    Ok((date.year(), date.month()))
}

fn parse_answer(s: &str) -> Result<(usize, String), String> {
    let (number, option) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <question>=<option>, got '{s}'"))?;
    let number: usize = number
        .trim()
        .parse()
        .map_err(|e| format!("invalid question number '{number}': {e}"))?;
    if number == 0 {
        return Err("question numbers start at 1".to_string());
    }
    Ok((number - 1, option.trim().to_string()))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = Config::load_from(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    let thresholds = config.thresholds()?;

    let store = match &cli.data {
        Some(dir) => JsonStore::with_base_dir(dir.clone())?,
        None => JsonStore::new()?,
    };
    // The wall clock is only consulted here; everything below takes `today`.
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    match cli.command {
        Command::Quiz {
            set,
            answers,
            page,
            record,
        } => run_quiz(
            &store, &config, &thresholds, today, &set, answers, page, record,
        ),
        Command::Level => {
            let profile = load_profile(&store)?;
            let progress = level_progress(profile.xp_points, profile.xp_to_next_level);
            let tier = level_tier(profile.level, &thresholds.level_tiers);
            print!(
                "{}",
                report::level_report(
                    &profile.reader_name,
                    profile.level,
                    tier,
                    profile.xp_points,
                    &progress
                )
            );
            Ok(())
        }
        Command::Skills => {
            let profile = load_profile(&store)?;
            let breakdown = skill_breakdown(&profile.skills, &thresholds.skill_tiers);
            print!("{}", report::skills_report(&breakdown));
            Ok(())
        }
        Command::Calendar { month, offset } => {
            let profile = load_profile(&store)?;
            let (year, month) = month.unwrap_or((today.year(), today.month()));
            let (year, month) = shift_month(year, month, offset);
            let calendar =
                month_calendar(&profile.activity, year, month, today, &thresholds.activity)
                    .ok_or_else(|| anyhow!("invalid month {year}-{month:02}"))?;
            let goal = goal_progress(calendar.summary.total_books, config.monthly_book_goal);
            let streak = current_streak(&profile.activity, today);
            print!(
                "{}",
                report::calendar_report(&calendar, streak, &goal, config.monthly_book_goal)
            );
            Ok(())
        }
        Command::Achievements => {
            let profile = load_profile(&store)?;
            print!(
                "{}",
                report::achievements_report(&profile.achievements, config.completion_policy)
            );
            Ok(())
        }
        Command::Star { text, against } => {
            let parts = analyze_star(&text);
            let comparison = against.as_deref().map(|model| {
                let model_parts = analyze_star(model);
                (
                    similarity(&text, model),
                    [
                        similarity(&parts.situation, &model_parts.situation),
                        similarity(&parts.task, &model_parts.task),
                        similarity(&parts.action, &model_parts.action),
                        similarity(&parts.result, &model_parts.result),
                    ],
                )
            });
            print!("{}", report::star_report(&parts, comparison));
            Ok(())
        }
        Command::Sets => {
            for name in content::available_question_sets() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Init {
            sample,
            force,
            write_config,
        } => run_init(&store, &config, &config_path, sample, force, write_config),
    }
}

fn load_profile(store: &JsonStore) -> Result<ProfileData> {
    let profile = store.load_profile().ok_or_else(|| {
        anyhow!(
            "profile in {} is unreadable; run `readwise init --force` to start over",
            store.base_dir().display()
        )
    })?;
    if profile.needs_reset() {
        bail!(
            "profile schema version {} is not supported; run `readwise init --force`",
            profile.schema_version
        );
    }
    Ok(profile)
}

#[allow(clippy::too_many_arguments)]
fn run_quiz(
    store: &JsonStore,
    config: &Config,
    thresholds: &Thresholds,
    today: NaiveDate,
    set_name: &str,
    answers: Vec<(usize, String)>,
    page: Option<u32>,
    record: bool,
) -> Result<()> {
    let set: QuestionSet = content::load_question_set(set_name)
        .ok_or_else(|| anyhow!("unknown question set '{set_name}'"))?;
    let questions: Vec<_> = match page {
        Some(page) => set
            .questions_for_page(page, &HashSet::new())
            .into_iter()
            .cloned()
            .collect(),
        None => set.post_reading().into_iter().cloned().collect(),
    };

    let answer_map = AnswerMap::from_indexed(&questions, answers);
    let result = score(&questions, &answer_map);
    let title = if set.title.is_empty() { &set.name } else { &set.title };
    print!(
        "{}",
        report::quiz_report(
            title,
            &questions,
            &result,
            thresholds,
            config.celebration_percentage
        )
    );

    if record {
        let mut profile = load_profile(store)?;
        let earned = if result.is_perfect() {
            xp_for(&[XpEvent::PerfectQuiz], &config.xp_awards)
        } else {
            0
        };
        profile.add_xp(earned);
        profile.record_quiz(QuizRecord::from_result(set_name, &result, today, Utc::now()));
        store.save_profile(&profile)?;
        tracing::info!("recorded quiz {set_name} for {today}, +{earned} XP");
        println!("Saved. +{earned} XP");
    }
    Ok(())
}

fn run_init(
    store: &JsonStore,
    config: &Config,
    config_path: &Path,
    sample: bool,
    force: bool,
    write_config: bool,
) -> Result<()> {
    if store.has_profile() && !force {
        bail!(
            "a profile already exists in {}; pass --force to replace it",
            store.base_dir().display()
        );
    }

    if sample {
        let json = content::sample_profile_json()
            .ok_or_else(|| anyhow!("bundled sample profile is missing"))?;
        let profile = store.import_profile_json(&json)?;
        println!("Created sample profile for {}", profile.reader_name);
    } else {
        let profile = ProfileData {
            achievements: content::sample_achievements()
                .into_iter()
                .map(|mut a| {
                    a.earned = false;
                    a.progress = a.requirement.map(|_| 0);
                    a
                })
                .collect(),
            ..ProfileData::default()
        };
        store.save_profile(&profile)?;
        println!("Created empty profile in {}", store.base_dir().display());
    }

    if write_config {
        config.save_to(config_path)?;
        println!("Wrote config to {}", config_path.display());
    }
    Ok(())
}
