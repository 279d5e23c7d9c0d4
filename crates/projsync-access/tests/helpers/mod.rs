pub mod mock_access_server;
