#[cfg(test)]
mod test_message;
#[cfg(test)]
mod test_user;

#[cfg(test)]
type TestResult = Result<(), Box<dyn std::error::Error>>;
