mod admin_token;
