use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;

use txlens::export;
use txlens::model::ResultBundle;
use txlens::render;
use txlens::view::ViewState;

use crate::error::ObserverError;
use crate::session::StoredAnalysis;
use crate::state::SharedState;

use super::types::{AnalysisResponse, AnalyzeRequest, PanelStatusResponse, TransactionsResponse};

// ============================================================================
// PANEL
// ============================================================================

pub async fn panel_page_handler(State(state): State<SharedState>) -> Html<String> {
    let panel = state.panel.read().unwrap();
    Html(panel.render_page())
}

pub async fn panel_status_handler(State(state): State<SharedState>) -> Json<PanelStatusResponse> {
    let panel = state.panel.read().unwrap();
    Json(PanelStatusResponse::from_panel(&panel))
}

/// OPEN_PANEL: unhide the panel.
pub async fn panel_open_handler(State(state): State<SharedState>) -> Redirect {
    state.panel.write().unwrap().open();
    Redirect::to("/panel")
}

pub async fn panel_toggle_handler(State(state): State<SharedState>) -> Redirect {
    state.panel.write().unwrap().toggle_visibility();
    Redirect::to("/panel")
}

/// Run a classification over the session's known transactions.
///
/// The panel transitions to `Requesting` up front (refusing duplicate
/// triggers) and settles to `Ready` or `Error` when the request completes;
/// either way the action ends up re-enabled.
pub async fn panel_analyze_handler(
    State(state): State<SharedState>,
) -> Result<Redirect, ObserverError> {
    state.panel.write().unwrap().begin_request()?;

    let hashes = state.session.read().unwrap().hashes().to_vec();
    let outcome = run_analysis(&state, hashes).await;

    match outcome {
        Ok(_) => {
            let count = state.session.read().unwrap().transaction_count();
            state.panel.write().unwrap().complete_success(count);
            Ok(Redirect::to("/view"))
        }
        Err(e) => {
            log::warn!("Analysis request failed: {}", e);
            state.panel.write().unwrap().complete_failure(e.to_string());
            Ok(Redirect::to("/panel"))
        }
    }
}

// ============================================================================
// ANALYSIS API
// ============================================================================

/// GET_TRANSACTIONS: identifiers known to the session plus raw transfers.
pub async fn transactions_handler(
    State(state): State<SharedState>,
) -> Json<TransactionsResponse> {
    let session = state.session.read().unwrap();
    Json(TransactionsResponse {
        hashes: session.hashes().to_vec(),
        transfers: session.transfers(),
    })
}

/// ANALYZE_WALLET: classify an explicit identifier list.
pub async fn analyze_handler(
    State(state): State<SharedState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<ResultBundle>, ObserverError> {
    let stored = run_analysis(&state, req.hashes).await?;
    Ok(Json(stored.results))
}

/// GET_ANALYSIS_DATA: the session's current analysis.
pub async fn analysis_handler(
    State(state): State<SharedState>,
) -> Result<Json<AnalysisResponse>, ObserverError> {
    let stored = state
        .session
        .read()
        .unwrap()
        .current()
        .ok_or(ObserverError::NoAnalysis)?;
    Ok(Json(AnalysisResponse::from(stored)))
}

/// GET_CACHED_ANALYSIS: a cached analysis for a specific cluster.
pub async fn cached_analysis_handler(
    State(state): State<SharedState>,
    Path(cluster): Path<String>,
) -> Result<Json<AnalysisResponse>, ObserverError> {
    let stored = state
        .session
        .read()
        .unwrap()
        .cached(&cluster)
        .ok_or(ObserverError::NoAnalysis)?;
    Ok(Json(AnalysisResponse::from(stored)))
}

/// Classify, store, and supersede the current view with the fresh result.
async fn run_analysis(
    state: &SharedState,
    hashes: Vec<String>,
) -> Result<StoredAnalysis, ObserverError> {
    if hashes.is_empty() {
        return Err(ObserverError::NoTransactions);
    }

    // Classifier call happens with no locks held.
    let bundle = state.classifier.analyze(&hashes).await?;

    let stored = state.session.write().unwrap().store_analysis(bundle);
    let fresh = ViewState::new(stored.results.clone(), stored.cluster.clone());
    *state.view.write().unwrap() = Some(fresh);
    Ok(stored)
}

// ============================================================================
// VIEW
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub cluster: Option<String>,
}

/// The full analysis view. With `?cluster=`, renders that cluster's cached
/// analysis (fresh view, filter reset); otherwise the current view, falling
/// back to the session's current analysis. Without any data this is
/// fatal-to-view: a terminal error page with no retry affordance.
pub async fn view_handler(
    State(state): State<SharedState>,
    Query(query): Query<ViewQuery>,
) -> Html<String> {
    let opts = state.config.render_options();

    if let Some(cluster) = query.cluster {
        let cached = state.session.read().unwrap().cached(&cluster);
        return match cached {
            Some(stored) => {
                let fresh = ViewState::new(stored.results, stored.cluster);
                let html = render::render_document(&fresh, &opts);
                *state.view.write().unwrap() = Some(fresh);
                Html(html)
            }
            None => Html(render::render_error_page("", &opts)),
        };
    }

    {
        let guard = state.view.read().unwrap();
        if let Some(view) = guard.as_ref() {
            return Html(render::render_document(view, &opts));
        }
    }

    let current = state.session.read().unwrap().current();
    match current {
        Some(stored) => {
            let fresh = ViewState::new(stored.results, stored.cluster);
            let html = render::render_document(&fresh, &opts);
            *state.view.write().unwrap() = Some(fresh);
            Html(html)
        }
        None => Html(render::render_error_page("", &opts)),
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub wallet: Option<String>,
}

/// Toggle the wallet filter and return the updated transaction-list region
/// and title. Pure recomputation over in-memory data, no re-fetch.
pub async fn view_filter_handler(
    State(state): State<SharedState>,
    Query(query): Query<FilterQuery>,
) -> Result<Html<String>, ObserverError> {
    let opts = state.config.render_options();
    let mut guard = state.view.write().unwrap();
    let view = guard.as_mut().ok_or(ObserverError::NoAnalysis)?;

    match query.wallet.as_deref() {
        Some(wallet) => view.filter_by_wallet(wallet),
        None => view.clear_filter(),
    }

    Ok(Html(render::render_list_fragment(view, &opts)))
}

// ============================================================================
// EXPORTS
// ============================================================================

/// Download the currently filtered view as CSV.
pub async fn export_csv_handler(
    State(state): State<SharedState>,
) -> Result<Response, ObserverError> {
    let csv = {
        let guard = state.view.read().unwrap();
        let view = guard.as_ref().ok_or(ObserverError::NoAnalysis)?;
        export::export_csv(view).map_err(|e| ObserverError::Export(e.to_string()))?
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::CSV_FILENAME),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Download the rendered view as a standalone document.
pub async fn export_html_handler(
    State(state): State<SharedState>,
) -> Result<Response, ObserverError> {
    let opts = state.config.render_options();
    let html = {
        let guard = state.view.read().unwrap();
        let view = guard.as_ref().ok_or(ObserverError::NoAnalysis)?;
        export::export_document(view, &opts)
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/html".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::HTML_FILENAME),
            ),
        ],
        html,
    )
        .into_response())
}
