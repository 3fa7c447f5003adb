pub mod model_starter;
