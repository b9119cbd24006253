//! Comparison group assembly from configuration plus parsed measurements

use crate::config::{ClassDef, GroupDef};
use crate::model::{
    BenchmarkClass, ClassInfo, ComparisonGroup, Measurement, MeasurementTable, MethodRecord,
};

/// Build a comparison group in configured method order
///
/// Methods without a measurement row still appear, with an all-absent
/// measurement. The baseline comes from configuration, never from the data.
pub fn assemble_group(def: &GroupDef, measurements: &MeasurementTable) -> ComparisonGroup {
    let methods = def
        .methods
        .iter()
        .map(|method| {
            let measurement = match measurements.get(&method.name) {
                Some(m) => m.clone(),
                None => {
                    tracing::debug!(method = %method.name, group = %def.id, "no measurement row");
                    Measurement::absent()
                }
            };
            MethodRecord {
                name: method.name.clone(),
                label: method.label.clone(),
                code_snippet: method.code_snippet.clone(),
                is_baseline: !def.baseline.is_empty() && method.name == def.baseline,
                measurement,
            }
        })
        .collect();

    ComparisonGroup {
        id: def.id.clone(),
        name: def.name.clone(),
        description: def.description.clone(),
        baseline_name: def.baseline.clone(),
        methods,
    }
}

/// Build a whole benchmark class from its definition
pub fn assemble_class(def: &ClassDef, measurements: &MeasurementTable) -> BenchmarkClass {
    BenchmarkClass {
        info: ClassInfo {
            class_name: def.class_name.clone(),
            title: def.title.clone(),
            description: def.description.clone(),
            element_type: def.element_type.clone(),
            element_size: def.element_size,
            array_length: def.array_length,
            total_bytes: def.total_bytes,
        },
        groups: def
            .comparison_groups
            .iter()
            .map(|group| assemble_group(group, measurements))
            .collect(),
    }
}
