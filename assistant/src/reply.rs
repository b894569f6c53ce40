//! User-facing reply texts.
//!
//! All content uses the limited markdown subset understood by hosts:
//! `**bold**` and line breaks.

use crate::models::{ActorContext, Province, RouteQueryResult, RouteSource, StatsSnapshot};

/// Maximum number of municipalities listed before summarizing the rest.
pub const MAX_LISTED_MUNICIPALITIES: usize = 10;

const NO_PHONE: &str = "No indicado";

fn name_suffix(actor: Option<&ActorContext>) -> String {
    actor
        .map(|a| a.first_name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| format!(", {}", name))
        .unwrap_or_default()
}

/// First message of every session.
pub fn welcome(actor: Option<&ActorContext>) -> String {
    format!(
        "¡Hola{}! Soy el asistente de rutas. Puedo calcular distancias y tiempos entre \
         municipios y mostrarte los municipios de cada provincia.\n\
         Escribe **ayuda** para ver todo lo que puedo hacer.",
        name_suffix(actor)
    )
}

fn capabilities(actor: Option<&ActorContext>) -> String {
    let mut lines = vec![
        "• **Calcular rutas**: \"¿Cuánto tarda de Barcelona a Girona?\"",
        "• **Listar municipios**: \"Municipios de Lleida\"",
        "• **Tu perfil**: \"¿Quién soy?\"",
    ];
    if actor.is_some_and(ActorContext::is_admin) {
        lines.push("• **Estadísticas**: \"Ver estadísticas\" (caché y límite de peticiones)");
    }
    lines.join("\n")
}

pub fn greeting(actor: Option<&ActorContext>) -> String {
    format!(
        "¡Hola{}! ¿En qué puedo ayudarte?\n{}",
        name_suffix(actor),
        capabilities(actor)
    )
}

pub fn help(actor: Option<&ActorContext>) -> String {
    format!(
        "Esto es lo que puedo hacer{}:\n{}",
        name_suffix(actor),
        capabilities(actor)
    )
}

pub fn not_logged_in() -> String {
    "No has iniciado sesión. Inicia sesión para consultar tu perfil; mientras tanto \
     puedes seguir usando el asistente en modo demo."
        .to_string()
}

pub fn profile(actor: &ActorContext) -> String {
    format!(
        "**Tu perfil**\n\
         **Nombre:** {}\n\
         **Email:** {}\n\
         **Teléfono:** {}\n\
         **Rol:** {}\n\
         **Estado:** {}",
        actor.full_name(),
        actor.email,
        actor
            .phone
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(NO_PHONE),
        actor.role.label(),
        if actor.active { "Activo" } else { "Inactivo" },
    )
}

pub fn stats_denied() -> String {
    "Lo siento, las estadísticas del sistema solo están disponibles para administradores."
        .to_string()
}

pub fn stats(snapshot: &StatsSnapshot) -> String {
    let cache = &snapshot.cache;
    let limit = &snapshot.rate_limit;
    format!(
        "**Estadísticas del sistema**\n\
         **Caché de rutas**\n\
         Entradas: {}\n\
         Tasa de aciertos: {}\n\
         Tasa de fallos: {}\n\
         **Límite de peticiones**\n\
         Restantes: {} de {}\n\
         Se reinicia: {}",
        cache.size,
        percent(cache.hit_rate),
        percent(cache.miss_rate),
        limit.remaining,
        limit.limit,
        limit.reset_at.format("%d/%m/%Y %H:%M UTC"),
    )
}

pub fn stats_failed() -> String {
    "No he podido obtener las estadísticas en este momento. Inténtalo de nuevo más tarde."
        .to_string()
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate.clamp(0.0, 1.0) * 100.0)
}

/// Distance with one decimal, e.g. `102.4 km`.
pub fn format_distance(km: f64) -> String {
    format!("{:.1} km", km)
}

/// Compact duration: `0 min`, `2h`, `45 min` or `1h 35min`.
pub fn format_duration(minutes: f64) -> String {
    let total = if minutes.is_finite() && minutes > 0.0 {
        minutes.round() as u64
    } else {
        0
    };
    let (hours, mins) = (total / 60, total % 60);

    match (hours, mins) {
        (0, 0) => "0 min".to_string(),
        (h, 0) => format!("{}h", h),
        (0, m) => format!("{} min", m),
        (h, m) => format!("{}h {}min", h, m),
    }
}

pub fn route(result: &RouteQueryResult) -> String {
    let mut text = format!(
        "**{} → {}**\n\
         Distancia: **{}**\n\
         Duración estimada: **{}**",
        result.origin,
        result.destination,
        format_distance(result.distance_km),
        format_duration(result.duration_minutes),
    );
    if result.source == RouteSource::Cache {
        text.push_str("\n⚡ Resultado obtenido de la caché.");
    }
    text
}

/// Reply for a route the service answered but could not compute.
pub fn route_rejected(result: &RouteQueryResult) -> String {
    match result.error_message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => "No he podido calcular la ruta. Comprueba que los nombres de los municipios \
              sean correctos."
            .to_string(),
    }
}

pub fn route_failed(origin: &str, destination: &str) -> String {
    format!(
        "Ha ocurrido un error al calcular la ruta entre **{}** y **{}**. \
         Inténtalo de nuevo más tarde.",
        origin, destination
    )
}

pub fn route_missing_places() -> String {
    "Necesito un origen y un destino. Prueba con: \"Ruta de Barcelona a Girona\".".to_string()
}

fn province_list() -> String {
    let names: Vec<String> = Province::ALL
        .iter()
        .map(|p| format!("**{}**", p.name()))
        .collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} y {}", rest.join(", "), last),
        _ => names.concat(),
    }
}

pub fn invalid_province(entity: &str) -> String {
    if entity.is_empty() {
        return format!("Indica una provincia: {}.", province_list());
    }
    format!(
        "\"{}\" no es una provincia válida. Las provincias disponibles son: {}.",
        entity,
        province_list()
    )
}

pub fn municipalities(province: Province, names: &[String]) -> String {
    if names.is_empty() {
        return format!("No he encontrado municipios en la provincia de {}.", province);
    }

    let mut text = format!("**Municipios de {}** ({}):", province, names.len());
    for name in names.iter().take(MAX_LISTED_MUNICIPALITIES) {
        text.push_str("\n• ");
        text.push_str(name);
    }
    if names.len() > MAX_LISTED_MUNICIPALITIES {
        text.push_str(&format!(
            "\n...y {} más",
            names.len() - MAX_LISTED_MUNICIPALITIES
        ));
    }
    text
}

pub fn municipalities_failed(province: Province) -> String {
    format!(
        "No he podido obtener los municipios de {}. Inténtalo de nuevo más tarde.",
        province
    )
}

pub fn fallback() -> String {
    "No he entendido tu mensaje. Prueba con algo como:\n\
     • \"¿Cuánto tarda de Barcelona a Girona?\"\n\
     • \"Municipios de Tarragona\"\n\
     • \"Ayuda\""
        .to_string()
}

/// Reply used when a handler failed in an unexpected way.
pub fn internal_error() -> String {
    "Lo siento, ha ocurrido un error inesperado. Inténtalo de nuevo.".to_string()
}
