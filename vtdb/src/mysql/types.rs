//! Conversions between vtdb and mysql_async values

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use mysql_async::{Column, Params as MySqlParams, Row as MySqlAsyncRow, Value as MySqlValue};

use crate::error::{Error, Result};
use crate::params::Params;
use crate::row::{Field, Row};
use crate::value::Value;

pub(crate) fn to_mysql_params(params: &Params) -> MySqlParams {
    match params {
        Params::Empty => MySqlParams::Empty,
        Params::Positional(values) => {
            MySqlParams::Positional(values.iter().map(to_mysql_value).collect())
        }
        Params::Named(vars) => MySqlParams::Named(
            vars.iter()
                .map(|(name, value)| (name.clone().into_bytes(), to_mysql_value(value)))
                .collect::<HashMap<_, _>>(),
        ),
    }
}

pub(crate) fn to_mysql_value(value: &Value) -> MySqlValue {
    match value {
        Value::Null => MySqlValue::NULL,
        Value::Int(v) => MySqlValue::Int(*v),
        Value::UInt(v) => MySqlValue::UInt(*v),
        Value::Float(v) => MySqlValue::Double(*v),
        Value::Bytes(v) => MySqlValue::Bytes(v.clone()),
        Value::String(v) => MySqlValue::Bytes(v.clone().into_bytes()),
        Value::Date(v) => {
            MySqlValue::Date(v.year() as u16, v.month() as u8, v.day() as u8, 0, 0, 0, 0)
        }
        Value::DateTime(v) => MySqlValue::Date(
            v.year() as u16,
            v.month() as u8,
            v.day() as u8,
            v.hour() as u8,
            v.minute() as u8,
            v.second() as u8,
            v.and_utc().timestamp_subsec_micros(),
        ),
        Value::Time(v) => MySqlValue::Time(
            false,
            0,
            v.hour() as u8,
            v.minute() as u8,
            v.second() as u8,
            v.nanosecond() / 1000,
        ),
        Value::Decimal(v) => MySqlValue::Bytes(v.to_string().into_bytes()),
    }
}

pub(crate) fn from_mysql_value(value: MySqlValue) -> Result<Value> {
    match value {
        MySqlValue::NULL => Ok(Value::Null),
        MySqlValue::Bytes(v) => match String::from_utf8(v) {
            Ok(s) => Ok(Value::String(s)),
            Err(e) => Ok(Value::Bytes(e.into_bytes())),
        },
        MySqlValue::Int(v) => Ok(Value::Int(v)),
        MySqlValue::UInt(v) => Ok(Value::UInt(v)),
        MySqlValue::Float(v) => Ok(Value::Float(f64::from(v))),
        MySqlValue::Double(v) => Ok(Value::Float(v)),
        // Zero dates (`0000-00-00`) and other impossible dates read as NULL.
        MySqlValue::Date(year, month, day, hour, min, sec, micro) => {
            let Some(date) =
                NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
            else {
                return Ok(Value::Null);
            };
            if hour == 0 && min == 0 && sec == 0 && micro == 0 {
                return Ok(Value::Date(date));
            }
            let time = clock(hour, min, sec, micro)?;
            Ok(Value::DateTime(NaiveDateTime::new(date, time)))
        }
        // TIME columns may be negative or span days; those stay textual and
        // can be read with `times::parse_time_delta`.
        MySqlValue::Time(is_neg, days, hours, mins, secs, micro) => {
            if is_neg || days > 0 || hours >= 24 {
                let total_hours = days * 24 + u32::from(hours);
                let sign = if is_neg { "-" } else { "" };
                return Ok(Value::String(format!(
                    "{sign}{total_hours:02}:{mins:02}:{secs:02}.{micro:06}"
                )));
            }
            Ok(Value::Time(clock(hours, mins, secs, micro)?))
        }
    }
}

fn clock(hour: u8, min: u8, sec: u8, micro: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_micro_opt(u32::from(hour), u32::from(min), u32::from(sec), micro)
        .ok_or_else(|| Error::TypeConversion {
            expected: "time",
            actual: format!("{hour}:{min}:{sec}.{micro}"),
        })
}

pub(crate) fn to_field(column: &Column) -> Field {
    Field::new(
        column.name_str().into_owned(),
        format!("{:?}", column.column_type()),
    )
}

pub(crate) fn from_mysql_row(row: MySqlAsyncRow) -> Result<Row> {
    let mut values = Vec::with_capacity(row.len());
    for i in 0..row.len() {
        let value = row
            .as_ref(i)
            .ok_or_else(|| Error::ColumnNotFound(format!("#{i}")))?
            .clone();
        values.push(from_mysql_value(value)?);
    }
    Ok(Row::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::times;

    #[test]
    fn test_midnight_datetime_reads_as_date() {
        let value = from_mysql_value(MySqlValue::Date(2012, 3, 4, 0, 0, 0, 0)).unwrap();
        assert_eq!(value, Value::Date(NaiveDate::from_ymd_opt(2012, 3, 4).unwrap()));
    }

    #[test]
    fn test_zero_date_reads_as_null() {
        let value = from_mysql_value(MySqlValue::Date(0, 0, 0, 0, 0, 0, 0)).unwrap();
        assert_eq!(value, Value::Null);
        let value = from_mysql_value(MySqlValue::Date(0, 0, 0, 12, 30, 0, 0)).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_long_time_stays_textual() {
        let value = from_mysql_value(MySqlValue::Time(true, 1, 2, 3, 4, 0)).unwrap();
        assert_eq!(value, Value::String("-26:03:04.000000".into()));
        let Value::String(text) = value else {
            unreachable!()
        };
        let delta = times::parse_time_delta(&text).unwrap();
        assert_eq!(delta.num_seconds(), -(26 * 3600 + 3 * 60 + 4));
    }

    #[test]
    fn test_invalid_utf8_stays_binary() {
        let value = from_mysql_value(MySqlValue::Bytes(vec![0xff, 0x00])).unwrap();
        assert_eq!(value, Value::Bytes(vec![0xff, 0x00]));
    }

    #[test]
    fn test_named_params_keep_names() {
        let params = to_mysql_params(&Params::named([("id", 7)]));
        let MySqlParams::Named(map) = params else {
            panic!("expected named params");
        };
        assert_eq!(map.get(b"id".as_slice()), Some(&MySqlValue::Int(7)));
    }
}
