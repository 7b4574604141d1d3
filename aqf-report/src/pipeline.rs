use crate::config::{AnalysisConfig, AnalysisMode};
use crate::response::{
    AiGeneration, CurrentConditions, DataSummary, FullResponse, ParameterAnalysis,
    PredictionEntry, QuickResponse, ReferenceImage, Summary, STATUS_SUCCESS,
};
use crate::sanitize::to_sanitized_json;
use crate::statistics::summarize;
use aqf_data::concentrations::PollutantConcentrations;
use aqf_data::series::NormalizeReport;
use aqf_data::{normalize, resolve_columns, ColumnMap, ObservationSeries, RawTable};
use aqf_forecast::{evaluate_forecast, AdditiveForecaster, Forecast, Forecaster};
use aqf_index::{aqi_breakdown, haze_intensity, health_recommendations, primary_pollutant, AqiBreakdown};
use aqf_utils::error::{AnalysisError, Result};
use aqf_utils::stats;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use url::Url;

pub const GEMINI_APP_URL: &str = "https://gemini.google.com/app";

/// Runs the analysis for one uploaded dataset at a time. Holds no
/// per-request state, so one analyzer can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Analyzer<F = AdditiveForecaster> {
    config: AnalysisConfig,
    forecaster: F,
}

impl Analyzer<AdditiveForecaster> {
    pub fn new(config: AnalysisConfig) -> Self {
        let forecaster = AdditiveForecaster::new(config.model.clone());
        Analyzer { config, forecaster }
    }
}

impl Default for Analyzer<AdditiveForecaster> {
    fn default() -> Self {
        Analyzer::new(AnalysisConfig::default())
    }
}

/// Everything derived from the CSV before forecasting.
struct Prepared {
    columns: ColumnMap,
    series: ObservationSeries,
    report: NormalizeReport,
    concentrations: PollutantConcentrations,
    breakdown: AqiBreakdown,
}

/// Parts shared by the full and quick reports.
struct Core {
    prepared: Prepared,
    forecast: Forecast,
    current_conditions: CurrentConditions,
    predictions: Vec<PredictionEntry>,
    predicted: f64,
}

impl<F> Analyzer<F>
where
    F: Forecaster + Clone + Send + 'static,
{
    pub fn with_forecaster(config: AnalysisConfig, forecaster: F) -> Self {
        Analyzer { config, forecaster }
    }

    /// Full analysis as a sanitized JSON body.
    pub async fn analyze(&self, csv: &str, image: Option<ReferenceImage>) -> Result<Value> {
        let report = self.full_report(csv, image).await?;
        to_sanitized_json(&report)
    }

    /// Quick analysis as a sanitized JSON body.
    pub async fn quick(&self, csv: &str) -> Result<Value> {
        let report = self.quick_report(csv).await?;
        to_sanitized_json(&report)
    }

    pub async fn full_report(
        &self,
        csv: &str,
        image: Option<ReferenceImage>,
    ) -> Result<FullResponse> {
        let core = self.run_core(csv, AnalysisMode::Full).await?;
        let Core {
            prepared,
            forecast,
            current_conditions,
            predictions,
            predicted,
        } = core;

        let statistics = summarize(
            &prepared.series,
            self.config.recent_window,
            self.config.safe_threshold,
        );
        let primary = primary_pollutant(&prepared.breakdown, predicted);
        let model_evaluation = evaluate_forecast(&prepared.series, &forecast);
        log::info!(
            "Model evaluation: MAE {:.2}, RMSE {:.2}, R² {:.3}, MAPE {:.1}%",
            model_evaluation.mae,
            model_evaluation.rmse,
            model_evaluation.r2,
            model_evaluation.mape
        );

        let window = self.config.recent_window;
        let multi_parameter_analysis = prepared
            .concentrations
            .iter()
            .map(|(pollutant, readings)| {
                let analysis = ParameterAnalysis {
                    latest_value: readings.latest().unwrap_or(stats::DEFAULT),
                    average_30_days: readings.recent_average(window),
                    maximum_30_days: readings.recent_maximum(window),
                    unit: pollutant.unit(),
                    aqi: prepared.breakdown.get(*pollutant).unwrap_or(0),
                };
                (*pollutant, analysis)
            })
            .collect();

        let data_summary = DataSummary {
            rows_total: prepared.report.rows_total,
            rows_valid: prepared.report.rows_valid(),
            rows_dropped: prepared.report.rows_dropped(),
            parameters_analyzed: prepared.concentrations.iter().map(|(p, _)| *p).collect(),
            columns_detected: prepared.columns.to_field_map(),
        };

        let ai_generation = ai_generation(&forecast)?;
        let summary = Summary::new(&primary, statistics.recent_30_days.trend_direction);

        Ok(FullResponse {
            status: STATUS_SUCCESS,
            timestamp: timestamp(),
            analysis_type: AnalysisMode::Full,
            current_conditions,
            predictions,
            statistics,
            aqi_breakdown: prepared.breakdown,
            primary_pollutant: primary,
            multi_parameter_analysis,
            health_recommendations: health_recommendations(predicted),
            model_evaluation,
            summary,
            data_summary,
            ai_generation,
            reference_image: image,
        })
    }

    pub async fn quick_report(&self, csv: &str) -> Result<QuickResponse> {
        let core = self.run_core(csv, AnalysisMode::Quick).await?;
        let statistics = summarize(
            &core.prepared.series,
            self.config.recent_window,
            self.config.safe_threshold,
        );
        let primary = primary_pollutant(&core.prepared.breakdown, core.predicted);
        let summary = Summary::new(&primary, statistics.recent_30_days.trend_direction);

        Ok(QuickResponse {
            status: STATUS_SUCCESS,
            timestamp: timestamp(),
            analysis_type: AnalysisMode::Quick,
            current_conditions: core.current_conditions,
            predictions: core.predictions,
            statistics,
            aqi_breakdown: core.prepared.breakdown,
            primary_pollutant: primary,
            health_recommendations: health_recommendations(core.predicted),
            summary,
        })
    }

    async fn run_core(&self, csv: &str, mode: AnalysisMode) -> Result<Core> {
        let prepared = prepare(csv)?;
        let horizon = self.config.horizon(mode);
        let forecast = self.forecast(prepared.series.clone(), horizon).await?;

        let latest = prepared
            .series
            .latest()
            .map(|o| o.value)
            .ok_or(AnalysisError::NoValidData)?;
        let predicted = forecast
            .future()
            .first()
            .map(|p| stats::finite_or_default(p.yhat))
            .ok_or_else(|| AnalysisError::Internal("forecast has no future rows".to_string()))?;
        let (category, color) = aqf_index::classify(predicted);
        let current_conditions = CurrentConditions {
            latest,
            predicted,
            category,
            color,
            pollutant_levels: prepared.concentrations.latest().into_iter().collect(),
        };
        let predictions = forecast.future().iter().map(PredictionEntry::from).collect();

        Ok(Core {
            prepared,
            forecast,
            current_conditions,
            predictions,
            predicted,
        })
    }

    /// Fit on a blocking thread, bounded by the configured timeout.
    async fn forecast(&self, series: ObservationSeries, horizon: usize) -> Result<Forecast> {
        let forecaster = self.forecaster.clone();
        let limit = self.config.fit_timeout();
        let task = tokio::task::spawn_blocking(move || forecaster.fit_predict(&series, horizon));
        match tokio::time::timeout(limit, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(AnalysisError::Internal(format!("forecast task failed: {}", e))),
            Err(_) => {
                log::warn!("Forecast exceeded {:?}, abandoning request", limit);
                Err(AnalysisError::ForecastTimeout(limit))
            }
        }
    }
}

fn prepare(csv: &str) -> Result<Prepared> {
    let table = RawTable::from_csv_str(csv)?;
    let columns = resolve_columns(table.headers())?;

    let (series, report) = normalize(&table, &columns.date, columns.pm25())?;
    let concentrations = PollutantConcentrations::from_table(&table, &columns)?;
    let breakdown = aqi_breakdown(&concentrations.latest());
    log::debug!("AQI breakdown: {:?}", breakdown);

    Ok(Prepared {
        columns,
        series,
        report,
        concentrations,
        breakdown,
    })
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Image-generation prompt for the last forecast day, with a Gemini link.
fn ai_generation(forecast: &Forecast) -> Result<AiGeneration> {
    let last = forecast
        .future()
        .last()
        .ok_or_else(|| AnalysisError::Internal("forecast has no future rows".to_string()))?;
    let aqi = stats::finite_or_default(last.yhat);
    let prompt = format!(
        "A realistic photo of a city skyline covered in smog, air pollution level AQI {}, haze intensity {}",
        aqi as i64,
        haze_intensity(aqi)
    );
    let gemini_url = Url::parse_with_params(GEMINI_APP_URL, &[("hl", "en-IN"), ("prompt", &prompt)])
        .map_err(|e| AnalysisError::Internal(format!("invalid Gemini URL: {}", e)))?;
    Ok(AiGeneration {
        prompt,
        gemini_url: gemini_url.to_string(),
    })
}
