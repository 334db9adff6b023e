pub mod authorizer_service;
