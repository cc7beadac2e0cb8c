use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    emoji::{emoji_to_unified, DEFAULT_GROUP_EMOJI},
    load_settings, ApiGateway, ApiHooks, GatewayError, OperationTracker,
};
use serde::Serialize;
use shared::{
    domain::{GroupId, ReviewId, StoreId},
    protocol::{
        CreateBookmarkGroupRequest, CreateBookmarkRequest, DeleteBookmarkGroupRequest,
        LoginRequest, ReviewRequest, SignUpRequest, StoreSearchParams,
    },
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_SESSION_FILE: &str = ".ywave/session.json";

#[derive(Parser, Debug)]
#[command(name = "ywave", about = "Place discovery and bookmarks from the terminal")]
struct Cli {
    /// Overrides the configured API base url.
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    /// Where the login session is kept between invocations.
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,
    #[arg(long)]
    radius: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    category: Option<String>,
}

impl From<SearchArgs> for StoreSearchParams {
    fn from(args: SearchArgs) -> Self {
        Self {
            lat: args.lat,
            lng: args.lng,
            radius: args.radius,
            limit: args.limit,
            category: args.category,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    Signup {
        email: String,
        password: String,
        nickname: String,
        #[arg(long)]
        photo_url: Option<String>,
        #[arg(long)]
        gps_allowed: bool,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    Profile,
    Popular(SearchArgs),
    Nearby(SearchArgs),
    /// Store details by store id, or by external place id with `--place-id`.
    Store {
        #[arg(required_unless_present = "place_id", conflicts_with = "place_id")]
        store_id: Option<i64>,
        #[arg(long)]
        place_id: Option<String>,
    },
    Recommend {
        #[arg(long)]
        limit: Option<u32>,
    },
    Groups,
    Group {
        group_id: i64,
    },
    CreateGroup {
        name: String,
        #[arg(long, default_value = DEFAULT_GROUP_EMOJI)]
        emoji: String,
    },
    DeleteGroup {
        group_id: i64,
    },
    Bookmark {
        store_id: i64,
        #[arg(long)]
        group_id: Option<i64>,
    },
    Unbookmark {
        store_id: i64,
    },
    Reviews,
    Review {
        store_id: i64,
        rating: f64,
        content: String,
        #[arg(long = "img-url")]
        img_urls: Vec<String>,
    },
    DeleteReview {
        review_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings().context("failed to load client settings")?;
    if let Some(url) = cli.api_base_url {
        settings.api_base_url = url;
    }
    if let Some(path) = cli.session_file {
        settings.session_file = Some(path);
    }
    if settings.session_file.is_none() {
        settings.session_file = Some(PathBuf::from(DEFAULT_SESSION_FILE));
    }
    client_core::config::validate(&settings).context("invalid client settings")?;
    debug!(api_base_url = %settings.api_base_url, "cli: settings loaded");

    let gateway = ApiGateway::from_settings(&settings).context("failed to build api gateway")?;
    let hooks = ApiHooks::new(Arc::new(gateway));

    match cli.command {
        Command::Signup {
            email,
            password,
            nickname,
            photo_url,
            gps_allowed,
        } => {
            let outcome = hooks
                .user
                .signup(SignUpRequest {
                    email,
                    password,
                    nickname,
                    photo_url,
                    gps_allowed,
                })
                .await;
            report(&hooks.user.signup, outcome)
        }
        Command::Login { email, password } => {
            let outcome = hooks.user.login(LoginRequest { email, password }).await;
            if let Ok(response) = &outcome {
                info!(user_id = response.user.id.0, "cli: logged in");
            }
            report(&hooks.user.login, outcome)
        }
        Command::Logout => {
            hooks.user.logout().context("failed to clear session")?;
            println!("logged out");
            Ok(ExitCode::SUCCESS)
        }
        Command::Profile => {
            let outcome = hooks.user.get_profile().await;
            report(&hooks.user.profile, outcome)
        }
        Command::Popular(search) => {
            let outcome = hooks.store.get_popular_stores(search.into()).await;
            report(&hooks.store.popular, outcome)
        }
        Command::Nearby(search) => {
            let outcome = hooks.store.get_nearby_stores(search.into()).await;
            report(&hooks.store.nearby, outcome)
        }
        Command::Store { store_id, place_id } => match (store_id, place_id) {
            (_, Some(place_id)) => {
                let outcome = hooks.store.get_place_details_by_place_id(place_id).await;
                report(&hooks.store.place_details, outcome)
            }
            (Some(store_id), None) => {
                let outcome = hooks.store.get_store_details(StoreId(store_id)).await;
                report(&hooks.store.store_details, outcome)
            }
            (None, None) => anyhow::bail!("either a store id or --place-id is required"),
        },
        Command::Recommend { limit } => match hooks.store.get_recommendations(limit).await {
            Ok(stores) => print_json(&stores),
            Err(err) => Ok(fail(&format!("recommendations failed: {err}"), &err)),
        },
        Command::Groups => {
            let outcome = hooks.bookmark.get_bookmark_groups().await;
            report(&hooks.bookmark.groups, outcome)
        }
        Command::Group { group_id } => {
            let outcome = hooks.bookmark.get_bookmark_group(GroupId(group_id)).await;
            report(&hooks.bookmark.group, outcome)
        }
        Command::CreateGroup { name, emoji } => {
            let outcome = hooks
                .bookmark
                .create_bookmark_group(CreateBookmarkGroupRequest {
                    group_name: name.trim().to_string(),
                    icon_url: emoji_to_unified(&emoji),
                })
                .await;
            report(&hooks.bookmark.create_group, outcome)
        }
        Command::DeleteGroup { group_id } => {
            let outcome = hooks
                .bookmark
                .delete_bookmark_group(DeleteBookmarkGroupRequest {
                    group_id: GroupId(group_id),
                })
                .await;
            report(&hooks.bookmark.delete_group, outcome)
        }
        Command::Bookmark { store_id, group_id } => {
            let outcome = hooks
                .bookmark
                .create_bookmark(
                    StoreId(store_id),
                    CreateBookmarkRequest {
                        group_id: group_id.map(GroupId),
                    },
                )
                .await;
            report(&hooks.bookmark.create_bookmark, outcome)
        }
        Command::Unbookmark { store_id } => {
            let outcome = hooks.bookmark.delete_bookmark(StoreId(store_id)).await;
            report(&hooks.bookmark.delete_bookmark, outcome)
        }
        Command::Reviews => {
            let outcome = hooks.review.get_my_reviews().await;
            report(&hooks.review.my_reviews, outcome)
        }
        Command::Review {
            store_id,
            rating,
            content,
            img_urls,
        } => {
            let outcome = hooks
                .review
                .create_review(
                    StoreId(store_id),
                    ReviewRequest {
                        rating,
                        content,
                        img_urls,
                    },
                )
                .await;
            report(&hooks.review.create_review, outcome)
        }
        Command::DeleteReview { review_id } => {
            let outcome = hooks.review.delete_review(ReviewId(review_id)).await;
            report(&hooks.review.delete_review, outcome)
        }
    }
}

/// Prints the tracker's data on success, or its recorded error.
fn report<I, O>(
    tracker: &OperationTracker<I, O>,
    outcome: Result<O, GatewayError>,
) -> Result<ExitCode>
where
    I: Send + 'static,
    O: Serialize + Clone + Send + Sync + 'static,
{
    let state = tracker.state();
    match outcome {
        Ok(value) => print_json(state.data.as_ref().unwrap_or(&value)),
        Err(err) => {
            let message = state.error.unwrap_or_else(|| err.to_string());
            Ok(fail(&message, &err))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<ExitCode> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to render response")?
    );
    Ok(ExitCode::SUCCESS)
}

fn fail(message: &str, err: &GatewayError) -> ExitCode {
    debug!(
        operation = err.operation(),
        status = ?err.status(),
        code = ?err.code(),
        "cli: request failed"
    );
    eprintln!("{message}");
    if err.requires_reauth() {
        eprintln!("hint: run `ywave login <email> <password>` and retry");
    }
    ExitCode::FAILURE
}
