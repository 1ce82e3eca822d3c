//! Display labels for AeroAPI flight status values.
//!
//! The client application is Portuguese-language; labels are returned as-is
//! in `status_description`.

/// Human-readable label for an upstream status. Unknown values pass through.
pub fn status_description(status: &str) -> String {
    let label = match status {
        "Scheduled" => "Programado",
        "Active" => "Em voo",
        "Completed" => "Concluído",
        "Cancelled" => "Cancelado",
        "Diverted" => "Desviado",
        "DataSource" => "Fonte de dados",
        "Unknown" => "Desconhecido",
        other => other,
    };
    label.to_string()
}
