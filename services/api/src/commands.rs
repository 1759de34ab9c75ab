use crate::render::{render_json, render_view};
use clap::{Args, Subcommand};
use escola_finder::config::AppConfig;
use escola_finder::error::AppError;
use escola_finder::remote::{decode_schools, HttpSchoolSource};
use escola_finder::search::{
    DisplayState, EducationLevel, FilterCriteria, Network, PredicateFilter, ResultAssembler,
    SearchController, SearchView, ServerScope,
};
use escola_finder::session::{SessionStore, UserIdentity};
use escola_finder::telemetry;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Two-letter state code, e.g. SP
    #[arg(long)]
    pub(crate) uf: Option<String>,
    /// Municipality name, matched exactly by the school API
    #[arg(long)]
    pub(crate) municipio: Option<String>,
    /// Administrative network: municipal, estadual or privada
    #[arg(long, value_parser = crate::infra::parse_network)]
    pub(crate) rede: Option<Network>,
    /// Education level: early, late or secondary
    #[arg(long, value_parser = crate::infra::parse_level)]
    pub(crate) nivel: Option<EducationLevel>,
    /// Minimum IDEB score (0 to 10)
    #[arg(long, value_parser = crate::infra::parse_quality, default_value = "0")]
    pub(crate) min_quality: f64,
    /// Free-text filter over school and municipality names
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Read schools from a saved API response instead of calling the API
    #[arg(long)]
    pub(crate) payload: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl SearchArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::default()
            .with_state_code(self.uf.as_deref())
            .with_municipality(self.municipio.as_deref())
            .with_network(self.rede)
            .with_education_level(self.nivel)
            .with_free_text_query(self.query.clone().unwrap_or_default())
            .with_minimum_quality(self.min_quality)
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum SessionCommand {
    /// Store the identity used for searches
    Login {
        #[arg(long)]
        id: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Forget the stored identity
    Logout,
    /// Print the stored identity
    Show,
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let criteria = args.criteria();

    let view = match &args.payload {
        Some(path) => search_saved_payload(path, &criteria)?,
        None => {
            let store = SessionStore::new(&config.session.file);
            let mut controller = SearchController::default();
            controller.update_criteria(criteria.clone());

            match store.load()?.and_then(|identity| controller.sign_in(identity)) {
                Some(ticket) => {
                    let source = HttpSchoolSource::new(&config.upstream)?;
                    info!(endpoint = %source.endpoint(), "searching schools");
                    controller.fetch_with(&source, ticket).await;
                }
                None => warn!(path = ?store.path(), "no stored session; skipping fetch"),
            }
            controller.view()
        }
    };

    if args.json {
        println!("{}", render_json(&view).map_err(std::io::Error::other)?);
    } else {
        print!("{}", render_view(&view, &criteria).map_err(std::io::Error::other)?);
    }

    match view.error {
        Some(message) => Err(AppError::SearchFailed(message)),
        None => Ok(()),
    }
}

/// Saved responses carry no server-side scoping, so every criterion is
/// re-checked locally.
fn search_saved_payload(path: &Path, criteria: &FilterCriteria) -> Result<SearchView, AppError> {
    let body = std::fs::read(path)?;
    let records = decode_schools(&body)?;
    let results =
        ResultAssembler::new(PredicateFilter::new(ServerScope::Recheck)).assemble(&records, criteria);
    info!(path = ?path, loaded = records.len(), shown = results.count, "searched saved payload");

    let state = if results.is_empty() {
        DisplayState::NoResults
    } else {
        DisplayState::Results
    };
    Ok(SearchView {
        state,
        results,
        error: None,
    })
}

pub(crate) fn run_session(command: SessionCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = SessionStore::new(&config.session.file);

    match command {
        SessionCommand::Login { id, email, name } => {
            let display_name = if name.trim().is_empty() {
                email.clone()
            } else {
                name
            };
            let identity = UserIdentity::new(id, email, display_name)?;
            store.save(&identity)?;
            println!("Sessão iniciada para {} <{}>", identity.display_name, identity.email);
        }
        SessionCommand::Logout => {
            if store.clear()? {
                println!("Sessão encerrada");
            } else {
                println!("Nenhuma sessão ativa");
            }
        }
        SessionCommand::Show => match store.load()? {
            Some(identity) => println!(
                "{} <{}> (id {}, desde {})",
                identity.display_name,
                identity.email,
                identity.id,
                identity.created_at.format("%Y-%m-%d %H:%M UTC")
            ),
            None => println!("Nenhuma sessão ativa"),
        },
    }

    Ok(())
}
