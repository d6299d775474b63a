//! Handler implementations: request logging and the city map command dispatcher.

mod city_map;
mod logging;

pub use city_map::{
    invalid_color_message, remembered_message, CityMapHandler, MSG_CITY_NAME_UNRECOGNIZED,
    MSG_CITY_NOT_FOUND, MSG_GUIDE, MSG_HELP, MSG_NO_CITIES, MSG_REMEMBER_FAILED,
    MSG_REMEMBER_USAGE, MSG_REQUEST_FAILED, MSG_SHOW_CITY_USAGE, MSG_SHOW_MY_CITIES_FAILED,
    MSG_START, MSG_UNKNOWN_CITY,
};
pub use logging::LoggingHandler;
