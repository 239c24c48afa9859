// src/simulation/csv.rs

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::simulation::{StepRecord, TrackRecord};

/// 迎撃シミュレーションの CSV ヘッダー
pub const RUN_HEADER: &str = "step,time(s),true_x(m),true_y(m),meas_x(m),meas_y(m),est_x(m),est_y(m),interceptor_x(m),interceptor_y(m),intercepted\n";

/// 追尾のみの実行の CSV ヘッダー
pub const TRACK_HEADER: &str = "step,time(s),true_x(m),true_y(m),meas_x(m),meas_y(m),est_x(m),est_y(m)\n";

/// CSV出力の設定とヘッダーの書き込み
pub fn setup_csv_output<P: AsRef<Path>>(path: P, header: &str) -> std::io::Result<BufWriter<File>> {
    let output_file = File::create(path)?;
    let mut writer = BufWriter::new(output_file);
    writer.write_all(header.as_bytes())?;
    Ok(writer)
}

/// CSV行の作成
///
/// 発射待ち中は観測値の列を空にする。
pub fn create_csv_row(record: &StepRecord) -> String {
    let (meas_x, meas_y) = match record.observation {
        Some(z) => (z[0].to_string(), z[1].to_string()),
        None => (String::new(), String::new()),
    };
    format!(
        "{},{},{},{},{},{},{},{},{},{},{}\n",
        record.step_index,
        record.time,
        record.true_position[0],
        record.true_position[1],
        meas_x,
        meas_y,
        record.estimated_position[0],
        record.estimated_position[1],
        record.interceptor_position[0],
        record.interceptor_position[1],
        record.intercepted,
    )
}

pub fn create_track_csv_row(record: &TrackRecord) -> String {
    format!(
        "{},{},{},{},{},{},{},{}\n",
        record.step_index,
        record.time,
        record.true_position[0],
        record.true_position[1],
        record.observation[0],
        record.observation[1],
        record.estimated_position[0],
        record.estimated_position[1],
    )
}

/// 全ステップの書き込み
pub fn write_records<W: Write>(writer: &mut W, records: &[StepRecord]) -> std::io::Result<()> {
    for record in records {
        writer.write_all(create_csv_row(record).as_bytes())?;
    }
    writer.flush()
}

pub fn write_track_records<W: Write>(writer: &mut W, records: &[TrackRecord]) -> std::io::Result<()> {
    for record in records {
        writer.write_all(create_track_csv_row(record).as_bytes())?;
    }
    writer.flush()
}
