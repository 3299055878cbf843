pub mod channel;
pub mod pricing;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(
                web::scope("/pricing")
                    .route("/seasons", web::get().to(pricing::list_seasons))
                    .route("/seasons", web::post().to(pricing::create_season))
                    .route("/seasons/{id}", web::delete().to(pricing::delete_season))
                    .route("/special-periods", web::get().to(pricing::list_special_periods))
                    .route("/special-periods", web::post().to(pricing::create_special_period))
                    .route(
                        "/special-periods/{id}",
                        web::delete().to(pricing::delete_special_period),
                    )
                    .route("/overrides", web::get().to(pricing::list_overrides))
                    .route("/overrides", web::post().to(pricing::create_override))
                    .route("/overrides/{id}", web::delete().to(pricing::delete_override))
                    .route("/blocked-dates", web::get().to(pricing::list_blocked_dates))
                    .route("/blocked-dates", web::post().to(pricing::create_blocked_date))
                    .route(
                        "/blocked-dates/{id}",
                        web::delete().to(pricing::delete_blocked_date),
                    ),
            )
            .route(
                "/rooms/{id}/price",
                web::put().to(pricing::update_base_price),
            )
            .route(
                "/bookings/sweep-completed",
                web::post().to(pricing::sweep_completed_bookings),
            )
            .route(
                "/channel/sync/{room_id}",
                web::post().to(channel::sync_availability),
            )
            .route(
                "/channel/import/{room_id}",
                web::post().to(channel::import_bookings),
            ),
    );
}
