use aqf_report::{AnalysisConfig, Analyzer};
use aqf_utils::error::ErrorKind;
use serde_json::Value;

fn ten_day_csv() -> String {
    let mut csv = String::from("Date,PM25\n");
    // shuffled file order; the pipeline sorts by date
    for day in [4, 1, 9, 2, 10, 3, 6, 5, 8, 7] {
        csv.push_str(&format!("{:02}-03-2024,{}\n", day, 30 + day * 2 + day % 3));
    }
    csv
}

fn assert_all_finite(value: &Value) {
    match value {
        Value::Null => panic!("null in response"),
        Value::Number(n) => assert!(n.as_f64().map_or(false, f64::is_finite)),
        Value::Array(items) => items.iter().for_each(assert_all_finite),
        Value::Object(fields) => fields.values().for_each(assert_all_finite),
        _ => {}
    }
}

#[tokio::test]
async fn full_analysis_of_ten_day_pm25_series() {
    let body = Analyzer::default().analyze(&ten_day_csv(), None).await.unwrap();
    assert_all_finite(&body);

    assert_eq!(body["status"], "success");
    assert_eq!(body["analysis_type"], "full");
    assert_eq!(body["predictions"].as_array().unwrap().len(), 30);
    assert_eq!(body["predictions"][0]["date"], "2024-03-11");
    assert_eq!(body["predictions"][29]["date"], "2024-04-09");

    // 10 March holds 30 + 20 + 1
    assert_eq!(body["current_conditions"]["latest"], 51.0);
    assert_eq!(body["statistics"]["total_records"], 10);
    assert_eq!(body["statistics"]["date_range"]["start"], "2024-03-01");
    assert_eq!(body["statistics"]["date_range"]["end"], "2024-03-10");

    let breakdown = body["aqi_breakdown"].as_object().unwrap();
    assert_eq!(breakdown.len(), 1);
    assert!(breakdown.contains_key("pm25"));
    assert_eq!(body["primary_pollutant"]["pollutant"], "pm25");
    assert_eq!(body["summary"]["overall_aqi"], body["primary_pollutant"]["aqi_value"]);

    assert_eq!(body["data_summary"]["columns_detected"]["date"], "Date");
    assert_eq!(body["data_summary"]["columns_detected"]["pm25"], "PM25");

    let evaluation = &body["model_evaluation"];
    for key in ["mae", "mse", "rmse", "r2_score", "mape", "accuracy_percentage"] {
        assert!(evaluation.get(key).is_some(), "missing {key}");
    }
    for prediction in body["predictions"].as_array().unwrap() {
        let yhat = prediction["predicted_aqi"].as_f64().unwrap();
        assert!(prediction["confidence_lower"].as_f64().unwrap() <= yhat);
        assert!(prediction["confidence_upper"].as_f64().unwrap() >= yhat);
    }
}

#[tokio::test]
async fn quick_analysis_uses_seven_day_horizon() {
    let body = Analyzer::default().quick(&ten_day_csv()).await.unwrap();
    assert_all_finite(&body);
    assert_eq!(body["predictions"].as_array().unwrap().len(), 7);
    assert!(body.get("model_evaluation").is_none());
    assert!(body.get("multi_parameter_analysis").is_none());
}

#[tokio::test]
async fn secondary_pollutant_can_dominate() {
    let csv = "date,pm2.5,PM10\n\
        01-03-2024,8,150\n\
        02-03-2024,9,180\n\
        03-03-2024,10,200\n";
    let config = AnalysisConfig {
        quick_horizon_days: 2,
        ..AnalysisConfig::default()
    };
    let body = Analyzer::new(config).quick(csv).await.unwrap();
    assert_eq!(body["aqi_breakdown"]["pm25"], 42);
    assert_eq!(body["aqi_breakdown"]["pm10"], 123);
    assert_eq!(body["primary_pollutant"]["pollutant"], "pm10");
    assert_eq!(body["summary"]["overall_category"], "Unhealthy for Sensitive Groups");
}

#[tokio::test]
async fn dataset_without_valid_rows_is_rejected() {
    let err = Analyzer::default()
        .analyze("Date,PM25\nnot-a-date,12\n05-03-2024,\n", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let body = err.to_json();
    assert_eq!(body["error_type"], "ValidationError");
    assert!(body["message"].as_str().unwrap().contains("No valid data found"));
}

#[tokio::test]
async fn constant_series_is_a_forecast_error() {
    let csv = "Date,PM25\n01-03-2024,40\n02-03-2024,40\n03-03-2024,40\n";
    let err = Analyzer::default().quick(csv).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forecast);
    assert_eq!(err.kind().status_code(), 500);
}
