mod admin_test;
mod helpers;
mod order_test;
mod otp_test;
mod payment_test;
mod request_body_test;
mod session_test;
