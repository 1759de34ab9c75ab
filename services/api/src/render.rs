use crate::views::{SchoolCard, SearchOutput};
use escola_finder::search::{DisplayState, EducationLevel, FilterCriteria, QualityBand, SearchView};
use std::fmt::{self, Write as _};

pub(crate) const NO_RESULTS: &str = "Nenhuma escola encontrada";
pub(crate) const SIGNED_OUT: &str =
    "Nenhuma sessão ativa. Entre com `session login` para buscar escolas.";

/// Plain-text listing of a search view, one card per school.
pub(crate) fn render_view(
    view: &SearchView,
    criteria: &FilterCriteria,
) -> Result<String, fmt::Error> {
    let mut out = String::new();

    if let Some(error) = &view.error {
        writeln!(out, "! {error}")?;
    }

    match view.state {
        DisplayState::SignedOut => writeln!(out, "{SIGNED_OUT}")?,
        DisplayState::Loading => writeln!(out, "Carregando escolas...")?,
        DisplayState::NoResults => {
            writeln!(out, "{NO_RESULTS}")?;
            if criteria.has_quality_floor() {
                writeln!(
                    out,
                    "Tente reduzir o IDEB mínimo (atual {:.1}).",
                    criteria.minimum_quality
                )?;
            }
        }
        DisplayState::Results => {
            writeln!(out, "{} escola(s) encontrada(s)", view.results.count)?;
            for record in &view.results.records {
                render_card(&mut out, &SchoolCard::from_record(record))?;
            }
        }
    }

    Ok(out)
}

pub(crate) fn render_json(view: &SearchView) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SearchOutput::from(view))
}

fn render_card(out: &mut String, card: &SchoolCard) -> fmt::Result {
    let record = &card.record;
    writeln!(out)?;
    writeln!(out, "{}", record.name)?;
    writeln!(
        out,
        "  {} - {} | Rede {}",
        record.municipality, record.state_code, record.network
    )?;
    writeln!(out, "  Níveis: {}", card.levels)?;
    writeln!(out, "  IDEB {:.1} [{}]", card.quality, band_marker(card.quality_band))?;

    for level in EducationLevel::ordered() {
        if let Some(metric) = record.metric(level) {
            writeln!(
                out,
                "    IDEB {} ({}): {:.1} [{}]",
                level.query_value(),
                metric.reference_year,
                metric.score,
                band_marker(QualityBand::for_score(metric.score))
            )?;
        }
    }

    if let Some(distance) = record.distance_km {
        writeln!(out, "  Distância: {distance:.1} km")?;
    }
    Ok(())
}

fn band_marker(band: QualityBand) -> &'static str {
    match band {
        QualityBand::Excellent => "excelente",
        QualityBand::Good => "bom",
        QualityBand::Fair => "regular",
        QualityBand::Low => "baixo",
    }
}
