//! Table and CSV rendering of query results.

use serde_json::Value;

use solrack_client::{ProcessDataValues, SettingsValue};

use crate::commands::OutputArgs;

pub fn print_process_data(modules: &[ProcessDataValues], output: &OutputArgs) {
    if output.csv {
        let d = &output.delimiter;
        println!("Module{d}Processdata Id{d}Processdata Unit{d}Processdata Value");
        for module in modules {
            for pd in &module.processdata {
                println!(
                    "{}{d}{}{d}{}{d}{}",
                    module.module_id,
                    pd.id,
                    pd.unit,
                    render_value(&pd.value)
                );
            }
        }
    } else {
        for module in modules {
            println!("Module: {}", module.module_id);
            for pd in &module.processdata {
                println!("{}\t{}\t{}", pd.id, pd.unit, render_value(&pd.value));
            }
            println!();
        }
    }
}

pub fn print_setting_values(values: &[SettingsValue], output: &OutputArgs) {
    if output.csv {
        let d = &output.delimiter;
        println!("Id{d}Value");
        for v in values {
            println!("{}{d}{}", v.id, v.value);
        }
    } else {
        println!("Id\tValue");
        for v in values {
            println!("{}\t{}", v.id, v.value);
        }
    }
}

/// Strings print bare; everything else in its JSON spelling.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_value_string_is_bare() {
        assert_eq!(render_value(&json!("on")), "on");
    }

    #[test]
    fn test_render_value_number_keeps_json_form() {
        assert_eq!(render_value(&json!(1536.2)), "1536.2");
        assert_eq!(render_value(&json!(42)), "42");
    }
}
