pub mod mails;
pub mod sendmail;
