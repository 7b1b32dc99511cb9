use crate::{api::attendance, auth::middleware::auth_middleware, config::Config, store::AttendanceStore};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{Scope, middleware::from_fn, web};

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure<S: AttendanceStore + 'static>(cfg: &mut web::ServiceConfig, config: &Config) {
    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(build_limiter(config.rate_protected_per_min)) // rate limiting
            .service(attendance_scope::<S>()),
    );
}

pub fn attendance_scope<S: AttendanceStore + 'static>() -> Scope {
    web::scope("/attendance")
        .service(web::resource("/clock-in").route(web::post().to(attendance::clock_in::<S>)))
        .service(web::resource("/clock-out").route(web::post().to(attendance::clock_out::<S>)))
        .service(web::resource("/week").route(web::get().to(attendance::week_summary::<S>)))
        .service(web::resource("/summary").route(web::get().to(attendance::range_summary::<S>)))
        .service(web::resource("/heal").route(web::post().to(attendance::heal_sessions::<S>)))
}
