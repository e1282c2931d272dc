use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizly_server::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config)
        .await
        .expect("failed to initialize application state");

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(handlers::health_check)
            .service(handlers::quiz_handler::create_quiz)
            .service(handlers::quiz_handler::list_quizzes)
            .service(handlers::quiz_handler::get_quiz)
            .service(handlers::quiz_handler::update_quiz)
            .service(handlers::quiz_handler::delete_quiz)
            .service(handlers::quiz_handler::publish_quiz)
            .service(handlers::quiz_handler::unpublish_quiz)
            .service(handlers::quiz_handler::list_class_quizzes)
            .service(handlers::quiz_handler::quiz_for_taking)
            .service(handlers::question_handler::add_question)
            .service(handlers::question_handler::update_question)
            .service(handlers::question_handler::delete_question)
            .service(handlers::question_handler::reorder_questions)
            .service(handlers::submission_handler::start_attempt)
            .service(handlers::submission_handler::list_attempts)
            .service(handlers::submission_handler::get_attempt)
            .service(handlers::submission_handler::record_answer)
            .service(handlers::submission_handler::complete_attempt)
            .service(handlers::submission_handler::grade_attempt)
            .service(handlers::submission_handler::review_attempt)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
